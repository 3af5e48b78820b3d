//! Request authentication against a remote OAuth service.
//!
//! Inbound requests carry the subject to resolve in the `userid` query
//! parameter. [`RequestAuthenticator`] looks up that subject's access token
//! and appends the resolved identity as headers:
//!
//! - `X-ClientId`: the application acting on the user's behalf
//! - `X-CallerId`: the end user
//!
//! Requests without a `userid`, or whose token does not exist, pass through
//! anonymously. Other lookup failures come back as a [`RestError`] for the
//! HTTP layer to surface.
//!
//! ## Usage
//!
//! ```ignore
//! let authenticator = RequestAuthenticator::new(OAuthConfig::default())?;
//! authenticator.authenticate_request(Some(&mut request)).await?;
//!
//! if !is_public(Some(&request)) && caller_id(Some(&request)) == 0 {
//!     return Err(RestError::new(401, "unauthorized", "authentication required"));
//! }
//! ```

mod authenticator;
mod error;
mod headers;
mod token;

pub use authenticator::RequestAuthenticator;
pub use error::RestError;
pub use headers::{
    HEADER_X_CALLER_ID, HEADER_X_CLIENT_ID, HEADER_X_PUBLIC, PARAM_USER_ID, caller_id, client_id,
    is_public,
};
pub use token::{AccessToken, TokenClient};
