//! Per-request identity resolution
//!
//! A request is either anonymous or carries the user its session token names.
//! Every way a token can be unusable (missing, malformed, badly signed,
//! expired, naming a user that no longer exists) resolves to anonymous. Only a
//! failing store is an error.

use axum::http::{header, HeaderMap};
use std::sync::Arc;
use taskly_auth::TokenCodec;
use taskly_store::{StoreError, User, UserFilter, UserStore};
use tracing::debug;

/// Context attached to every GraphQL request
#[derive(Clone)]
pub struct RequestContext {
    pub store: Arc<dyn UserStore>,
    /// Authenticated user, `None` for anonymous requests
    pub user: Option<User>,
}

/// Session token from the `Authorization` header
///
/// Accepts `Bearer <token>` as well as a bare token value.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim_start();

    let token = match value.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => &value[7..],
        _ => value,
    }
    .trim();

    (!token.is_empty()).then_some(token)
}

/// Resolve the user a session token belongs to
pub async fn resolve_identity(
    token: Option<&str>,
    codec: &TokenCodec,
    store: &dyn UserStore,
) -> Result<Option<User>, StoreError> {
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let Some(user_id) = codec.subject(token) else {
        debug!("Session token failed verification, treating request as anonymous");
        return Ok(None);
    };

    let user = store.find_one(&UserFilter::Id(user_id)).await?;
    if user.is_none() {
        debug!("Session token names unknown user {}", user_id);
    }

    Ok(user)
}
