//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;

use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/patients", get(endpoints::patients::list))
        .route("/patients/:id", get(endpoints::patients::detail))
        .route("/risk", get(endpoints::risk::assess))
        .route(
            "/simulate",
            get(endpoints::simulate::state).post(endpoints::simulate::control),
        )
        .route("/handover", get(endpoints::handover::summary))
        .route("/alerts", get(endpoints::alerts::list))
        .route("/alerts/:id", patch(endpoints::alerts::update))
        .route("/audit", get(endpoints::audit::list))
        .route("/comparison", get(endpoints::comparison::summary))
        .with_state(ctx);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes)
        .layer(axum::middleware::from_fn(middleware::request_log::log_request))
        .layer(cors)
}
