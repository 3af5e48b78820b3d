//! Identity headers on inbound requests.
//!
//! None of these accessors fail: a missing request, header or unparsable
//! value degrades to a default.

use http::{HeaderMap, Request};

/// Marks a request as not requiring identity resolution.
pub const HEADER_X_PUBLIC: &str = "X-Public";
/// Id of the application acting on the caller's behalf.
pub const HEADER_X_CLIENT_ID: &str = "X-ClientId";
/// Id of the end user the request acts for.
pub const HEADER_X_CALLER_ID: &str = "X-CallerId";

/// Query parameter naming the subject to resolve.
pub const PARAM_USER_ID: &str = "userid";

/// Whether the request is public. An absent request counts as public.
pub fn is_public<B>(request: Option<&Request<B>>) -> bool {
    match request {
        Some(req) => header_str(req.headers(), HEADER_X_PUBLIC) == Some("true"),
        None => true,
    }
}

/// Client id from `X-ClientId`, or 0.
pub fn client_id<B>(request: Option<&Request<B>>) -> i64 {
    request
        .map(|req| header_i64(req.headers(), HEADER_X_CLIENT_ID))
        .unwrap_or(0)
}

/// Caller id from `X-CallerId`, or 0.
pub fn caller_id<B>(request: Option<&Request<B>>) -> i64 {
    request
        .map(|req| header_i64(req.headers(), HEADER_X_CALLER_ID))
        .unwrap_or(0)
}

/// First value of the `userid` query parameter, percent-decoded and trimmed.
///
/// Returns `None` when the parameter is missing or blank.
pub(crate) fn user_id_param<B>(request: &Request<B>) -> Option<String> {
    let query = request.uri().query()?;

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == PARAM_USER_ID)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_i64(headers: &HeaderMap, name: &str) -> i64 {
    header_str(headers, name)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0)
}
