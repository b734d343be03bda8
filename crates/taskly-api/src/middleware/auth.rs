//! Session Identity Middleware
//!
//! Reads the session token from the Authorization header, resolves it to a
//! user and makes the result available to handlers as a `RequestContext`
//! extension. Requests without a usable token continue as anonymous; only a
//! store failure stops the request.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::error;

use crate::identity::{bearer_token, resolve_identity, RequestContext};
use crate::models::ErrorResponse;
use crate::AppState;

pub async fn attach_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let token = bearer_token(request.headers()).map(str::to_owned);

    let user = resolve_identity(token.as_deref(), &state.codec, state.store.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to resolve request identity: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                    code: Some("STORE_UNAVAILABLE".to_string()),
                }),
            )
        })?;

    request.extensions_mut().insert(RequestContext {
        store: state.store.clone(),
        user,
    });

    Ok(next.run(request).await)
}
