pub mod api;
pub mod auth;
mod config;

pub use auth::{
    AccessToken, RequestAuthenticator, RestError, TokenClient, caller_id, client_id, is_public,
};
pub use config::{ConfigError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, OAuthConfig};
