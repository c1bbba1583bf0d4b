//! Bearer token access middleware.
//!
//! Extracts `Authorization: Bearer <token>`, asks the configured
//! [`AccessVerifier`] for a decision, and rejects unauthorized callers
//! before the handler runs.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Require an authorized caller on generation routes.
///
/// Accesses `ApiContext` from request extensions (injected by the
/// Extension layer).
pub async fn require_access(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_access_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_access_inner(
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let decision = ctx.access.verify(bearer);
    if !decision.authorized {
        return Err(ApiError::Unauthorized);
    }

    if let Some(caller) = &decision.caller_id {
        tracing::debug!(caller, "Access granted");
    }

    Ok(next.run(req).await)
}
