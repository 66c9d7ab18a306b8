use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod auth;
pub mod brands;
pub mod categories;
pub mod doc;
pub mod health;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/users", auth::router())
        .route("/login", post(auth::login))
        .nest("/categories", categories::router())
        .nest("/produit", products::router())
        .nest("/produits", products::router())
        .nest("/brands", brands::router())
        .route("/brands-with-products", get(brands::brands_with_products))
}
