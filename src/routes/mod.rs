pub mod fuel_record_routes;
pub mod health_routes;
pub mod vehicle_routes;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo de la API
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_routes::health))
        .route("/api/summary", get(fuel_record_routes::summary))
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/records", fuel_record_routes::create_fuel_record_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
