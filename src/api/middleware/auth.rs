//! Identity-provider shim.
//!
//! The real identity provider is an external collaborator; callers
//! arrive with `X-Identity-Id` and `X-Identity-Groups` already issued.
//! This middleware turns those headers into an [`Identity`] extension
//! for downstream handlers, so the caller is always an explicit value
//! and never ambient state. A missing or blank id is rejected with 401.

use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::identity::{Group, Identity};

/// Require caller identity headers and inject [`Identity`].
pub async fn require_identity(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match identity_from_headers(req.headers()) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, ApiError> {
    let id = headers
        .get("X-Identity-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    // Unknown group names carry no grants, so they are simply dropped.
    let groups: Vec<Group> = headers
        .get("X-Identity-Groups")
        .and_then(|v| v.to_str().ok())
        .map(|raw| raw.split(',').filter_map(|g| Group::from_str(g.trim())).collect())
        .unwrap_or_default();

    Ok(Identity::new(id, groups))
}
