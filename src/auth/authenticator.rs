//! Request authentication against the OAuth service.

use http::{HeaderValue, Request};
use tracing::debug;

use crate::auth::error::RestError;
use crate::auth::headers::{HEADER_X_CALLER_ID, HEADER_X_CLIENT_ID, user_id_param};
use crate::auth::token::{AccessToken, TokenClient};
use crate::config::{ConfigError, OAuthConfig};

/// Resolves the identity of inbound requests.
///
/// Holds no per-request state; share one instance behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    tokens: TokenClient,
}

impl RequestAuthenticator {
    /// Create an authenticator, rejecting an invalid config up front.
    pub fn new(config: OAuthConfig) -> Result<Self, ConfigError> {
        let tokens = TokenClient::new(&config)?;
        Ok(Self { tokens })
    }

    pub fn token_client(&self) -> &TokenClient {
        &self.tokens
    }

    /// Resolve the `userid` query parameter into `X-ClientId` / `X-CallerId`.
    ///
    /// An absent request, a blank `userid` or a not-found lookup all leave
    /// the request untouched and return `Ok(())`. Any other lookup error is
    /// returned as-is. The headers are appended, so authenticating the same
    /// request twice yields duplicate values.
    pub async fn authenticate_request<B>(
        &self,
        request: Option<&mut Request<B>>,
    ) -> Result<(), RestError> {
        let Some(request) = request else {
            return Ok(());
        };

        let Some(user_id) = user_id_param(request) else {
            return Ok(());
        };

        let token = match self.tokens.get_access_token(&user_id).await {
            Ok(token) => token,
            Err(err) if err.is_not_found() => {
                debug!(%user_id, "No access token found, request stays anonymous");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        apply_identity(request, &token);
        debug!(
            %user_id,
            client_id = token.client_id,
            caller_id = token.user_id,
            "Request authenticated"
        );

        Ok(())
    }
}

fn apply_identity<B>(request: &mut Request<B>, token: &AccessToken) {
    let headers = request.headers_mut();
    headers.append(HEADER_X_CLIENT_ID, HeaderValue::from(token.client_id));
    headers.append(HEADER_X_CALLER_ID, HeaderValue::from(token.user_id));
}
