pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/pricing",
            get(handlers::pricing::get_pricing).put(handlers::pricing::replace_pricing),
        )
        .route(
            "/api/discounts",
            get(handlers::discounts::list_discounts).post(handlers::discounts::create_discount),
        )
        .route("/api/discounts/:id", delete(handlers::discounts::delete_discount))
        .route("/api/schedule", get(handlers::schedule::get_schedule))
        .route("/api/quote", get(handlers::schedule::get_quote))
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route("/api/bookings/:id", patch(handlers::bookings::update_booking))
        .route("/api/bookings/:id/cancel", post(handlers::bookings::cancel_booking))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
