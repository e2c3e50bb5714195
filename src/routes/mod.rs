use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{estimate, geocode, health, sessions, tariffs};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Stateless engine routes
    let engine_routes = Router::new()
        .route("/tariffs", get(tariffs::list_tariffs))
        .route("/estimate", post(estimate::estimate_route))
        .route("/estimate/recompute", post(estimate::recompute_estimate))
        .route("/geocode", post(geocode::geocode_address))
        .route("/geocode/suggest", get(geocode::suggest_addresses));

    // Booking session lifecycle
    let session_routes = Router::new()
        .route("/", post(sessions::create_session))
        .route("/{id}", get(sessions::get_session))
        .route("/{id}", delete(sessions::delete_session))
        .route("/{id}/addresses", put(sessions::update_addresses))
        .route("/{id}/tier", put(sessions::select_tier))
        .route("/{id}/estimate", post(sessions::estimate_session));

    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api", engine_routes)
        .nest("/api/sessions", session_routes)
        .with_state(state)
}
