//! Access token lookup against the OAuth service.
//!
//! Every failure mode is reported as a [`RestError`]: transport errors and
//! undecodable bodies become not-found errors, while structured error
//! bodies from the service are passed through with their own status.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::auth::error::RestError;
use crate::config::{ConfigError, OAuthConfig};

/// Access token record returned by the OAuth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Opaque token string
    pub id: String,
    /// End user the token was issued for (the caller id)
    pub user_id: i64,
    /// Application the token was issued to (the client id)
    pub client_id: i64,
}

/// HTTP client for `GET /oauth/accesstoken/{userid}`.
#[derive(Debug, Clone)]
pub struct TokenClient {
    base_url: Url,
    client: reqwest::Client,
}

impl TokenClient {
    /// Create a client. The configured timeout bounds every lookup.
    pub fn new(config: &OAuthConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    /// URL of the token lookup for `user_id`, with the id percent-encoded
    /// as a single path segment.
    pub fn access_token_url(&self, user_id: &str) -> Result<Url, RestError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RestError::internal_server_error(format!(
                    "OAuth base URL cannot be a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["oauth", "accesstoken", user_id]);
        Ok(url)
    }

    /// Fetch the access token for `user_id`.
    pub async fn get_access_token(&self, user_id: &str) -> Result<AccessToken, RestError> {
        let url = self.access_token_url(user_id)?;
        debug!("Fetching access token from {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "OAuth service unreachable");
                return Err(RestError::not_found(
                    "invalid restclient response when trying to get access token",
                ));
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, %status, "Failed to read OAuth response body");
                return Err(RestError::not_found(
                    "invalid restclient response when trying to get access token",
                ));
            }
        };

        classify_response(status, &body)
    }
}

/// Map a status + body from the OAuth service onto a token or an error.
fn classify_response(status: StatusCode, body: &[u8]) -> Result<AccessToken, RestError> {
    if status.as_u16() > 299 {
        return match serde_json::from_slice::<RestError>(body) {
            Ok(err) => {
                debug!(status = err.status_code(), "OAuth service returned an error");
                Err(err)
            }
            Err(e) => {
                warn!(error = %e, %status, "Undecodable error body from OAuth service");
                Err(RestError::not_found(
                    "invalid error interface when trying to get access token",
                ))
            }
        };
    }

    serde_json::from_slice::<AccessToken>(body).map_err(|e| {
        warn!(error = %e, "Undecodable access token from OAuth service");
        RestError::not_found("error when trying to unmarshal access token")
    })
}
