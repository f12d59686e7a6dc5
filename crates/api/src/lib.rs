//! HTTP surface for the game reset orchestrator.
//!
//! Exposes the partial and full reset operations with structured logging
//! (tracing) and Prometheus metrics. The routing and JSON encoding here is
//! plumbing; the orchestration logic lives in the `orchestrator` crate.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::{AuditNotifier, StepExecutor};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::reset::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<E, A>(state: Arc<AppState<E, A>>, metrics_handle: PrometheusHandle) -> Router
where
    E: StepExecutor + 'static,
    A: AuditNotifier + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/game/reset/{player_id}", post(routes::reset::partial::<E, A>))
        .route(
            "/game/full-reset/{player_id}",
            post(routes::reset::full::<E, A>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
