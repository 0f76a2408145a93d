use axum::{routing::get, Router};

use crate::handlers;
use crate::middleware::cors;
use crate::state::{EdgeState, WorkerState};

/// Router for the worker tier: dashboard, DoH query path, health path.
///
/// Routes and the fallback are registered before the CORS layer so the
/// layer wraps every response, unmatched paths included.
pub fn worker_routes(state: WorkerState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route(
            "/dns-query",
            get(handlers::worker_query_get).post(handlers::worker_query_post),
        )
        .route("/healthz", get(handlers::worker_health))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(cors::cors_and_preflight))
        .with_state(state)
}

/// Router for the edge tier, identical in shape to the worker's.
pub fn edge_routes(state: EdgeState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route(
            "/dns-query",
            get(handlers::edge_query_get).post(handlers::edge_query_post),
        )
        .route("/healthz", get(handlers::edge_health))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(cors::cors_and_preflight))
        .with_state(state)
}
