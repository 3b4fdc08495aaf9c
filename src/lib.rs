pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;

use db::DbPool;

/// Assembles the full route table over a ready database pool.
pub fn router(pool: DbPool) -> Router {
    Router::new()
        // Auth
        .route("/auth/register", post(routes::register))
        .route("/auth/login", post(routes::login))
        .route("/auth/profile", put(routes::update_profile))
        .route("/auth/theme", put(routes::update_theme))
        // Releases
        .route("/releases", get(routes::list_releases))
        .route("/releases", post(routes::create_release))
        .route("/releases/{id}", get(routes::get_release))
        .route("/releases/{id}", put(routes::update_release))
        .route("/releases/{id}", delete(routes::delete_release))
        // Smartlinks
        .route("/smartlinks", get(routes::list_smartlinks))
        .route("/smartlinks", post(routes::create_smartlink))
        .route("/smartlinks/{id}", get(routes::get_smartlink))
        .route("/smartlinks/{id}", put(routes::update_smartlink))
        // Studio
        .route("/studio", get(routes::list_studio))
        .route("/studio", post(routes::create_studio_entity))
        .route("/studio/{id}", get(routes::get_studio_entity))
        .route("/studio/{id}", put(routes::update_studio_entity))
        // Tickets
        .route("/tickets", get(routes::list_tickets))
        .route("/tickets", post(routes::create_ticket))
        .route("/tickets/{id}", get(routes::get_ticket))
        .route("/tickets/{id}", put(routes::update_ticket))
        // Health check
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
