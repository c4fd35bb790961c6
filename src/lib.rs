pub mod audit;
pub mod catalog;
pub mod config;
pub mod coupons;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, routing::get};

use crate::{
    error::AppError,
    routes::{create_api_router, doc::scalar_docs, health},
    state::AppState,
};

/// Application router without transport layers. `main` wraps it with
/// tracing, request ids and limits.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
