// HTTP surface: identity resolution as axum middleware

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{Json, Response},
    routing::get,
};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::auth::{
    HEADER_X_CALLER_ID, HEADER_X_CLIENT_ID, RequestAuthenticator, RestError, caller_id, client_id,
    is_public,
};

pub type AppState = Arc<RequestAuthenticator>;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/whoami", get(whoami))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_middleware,
        ))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Resolve identity headers before the handler runs.
///
/// Public requests skip the lookup. Otherwise any identity headers the
/// client sent are dropped, so only values resolved here reach the handler.
/// A lookup error other than not-found rejects the request with the
/// error's own status and body.
async fn authenticate_middleware(
    State(authenticator): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, RestError> {
    if is_public(Some(&req)) {
        debug!(uri = %req.uri(), "Public request, skipping authentication");
        return Ok(next.run(req).await);
    }

    let headers = req.headers_mut();
    let spoofed_client = headers.remove(HEADER_X_CLIENT_ID).is_some();
    let spoofed_caller = headers.remove(HEADER_X_CALLER_ID).is_some();
    if spoofed_client || spoofed_caller {
        warn!(uri = %req.uri(), "Dropped client-supplied identity headers");
    }

    if let Err(err) = authenticator.authenticate_request(Some(&mut req)).await {
        warn!(
            uri = %req.uri(),
            status = err.status_code(),
            "Request rejected: {}",
            err.message()
        );
        return Err(err);
    }

    Ok(next.run(req).await)
}

async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Echo the identity the middleware resolved for this request.
async fn whoami(req: Request) -> Json<Value> {
    Json(serde_json::json!({
        "public": is_public(Some(&req)),
        "client_id": client_id(Some(&req)),
        "caller_id": caller_id(Some(&req)),
    }))
}
