//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Carts (requires auth)
//! GET  /                       - Cart list: date filter, paginated cart
//!                                tables, new-cart form (?new=1)
//! POST /carts                  - Submit a new cart
//!
//! # Products (requires auth)
//! GET  /products/{id}          - Product detail
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /register               - Register page
//! POST /register               - Register action
//! GET  /logout                 - Logout action
//! ```

pub mod auth;
pub mod carts;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(carts::index))
        .route("/carts", post(carts::create))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/products/{id}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(cart_routes())
        .merge(product_routes())
        .merge(auth_routes())
}
