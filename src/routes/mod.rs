use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod coupons;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod search;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/search", search::router())
        .nest("/products", products::router())
        .nest("/coupons", coupons::router())
        .nest("/auth", auth::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
}
