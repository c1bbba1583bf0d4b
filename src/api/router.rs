//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. Generation routes sit behind the
//! access middleware; the health check is open.

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost
/// layer). Endpoint handlers use `State<ApiContext>`.
pub fn api_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route("/generate", post(endpoints::generate::generate))
        .route("/generate/title", post(endpoints::generate::title))
        .route("/generate/cover", post(endpoints::generate::cover))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(
            middleware::access::require_access,
        ))
        .layer(axum::Extension(ctx.clone()));

    let open = Router::new()
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new().nest("/api", protected.merge(open))
}
