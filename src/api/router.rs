//! API router.
//!
//! Returns a composable `Router`. All routes except `/api/health` run
//! behind the identity middleware, which resolves the caller from the
//! identity-provider headers and injects it as an extension.

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route("/profiles", post(endpoints::profiles::upsert))
        .route("/profiles/:id", get(endpoints::profiles::detail))
        .route("/doctors", get(endpoints::roster::doctors))
        .route("/patients", get(endpoints::roster::patients))
        .route(
            "/appointments",
            post(endpoints::appointments::book).get(endpoints::appointments::list),
        )
        .route(
            "/appointments/:id",
            get(endpoints::appointments::detail).delete(endpoints::appointments::remove),
        )
        .route(
            "/appointments/:id/cancel",
            post(endpoints::appointments::cancel),
        )
        .route(
            "/appointments/:id/complete",
            post(endpoints::appointments::complete),
        )
        .route("/records", get(endpoints::records::list))
        .route(
            "/records/by-appointment/:id",
            get(endpoints::records::by_appointment),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(
            middleware::auth::require_identity,
        ));

    // Liveness probe stays outside the identity shim.
    let unprotected = Router::new()
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new().nest("/api", protected).nest("/api", unprotected)
}
