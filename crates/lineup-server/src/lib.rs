//! HTTP surface for the Lineup queue service.
//!
//! The router exposes the queue operations plus health endpoints. Token
//! verification happens at the gateway in front of this service; the
//! verified caller arrives as trusted `x-lineup-role` / `x-lineup-identity`
//! headers (see [`extract::Caller`]).

pub mod config;
pub mod extract;
pub mod handlers;
pub mod observability;
pub mod state;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route(
            "/queue",
            get(handlers::current_queue).post(handlers::create_queue),
        )
        .route("/queue/{id}", get(handlers::get_queue))
        .route("/queue/{id}/length", get(handlers::queue_length))
        .route("/queue/{id}/position", get(handlers::patient_position))
        .route("/queue/{id}/join", post(handlers::join))
        .route("/queue/{id}/leave", post(handlers::leave))
        .route("/queue/{id}/dequeue", post(handlers::dequeue))
        .route("/queue/{id}/spots", get(handlers::available_spots))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
