//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Catalog
//! GET    /api/products                  - Product listing
//! GET    /api/products/{id}             - Product detail
//!
//! # Cart
//! GET    /api/cart                      - Cart contents
//! POST   /api/cart/items                - Add one unit of (product, size)
//! PATCH  /api/cart/items                - Set a line's quantity (0 removes)
//! DELETE /api/cart/items                - Remove a line
//!
//! # Profile
//! GET    /api/profile                   - Saved customer profile
//! PUT    /api/profile                   - Overwrite the profile
//!
//! # Promo
//! POST   /api/promo/apply               - Validate a code and occupy the slot
//!
//! # Checkout
//! POST   /api/checkout/quote            - Delivery cost for a destination city
//! GET    /api/checkout/delivery-points  - Pickup points for a city code
//! POST   /api/checkout                  - Place the order
//!
//! # Orders
//! GET    /api/orders                    - Orders, newest first
//! GET    /api/orders/{id}               - Order detail
//! POST   /api/orders/{id}/status        - Manual status update
//! POST   /api/orders/{id}/refresh-status - Pull status from the carrier
//! ```

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod profile;
pub mod promo;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Assemble all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::list))
        .route("/api/products/{id}", get(products::detail))
        .route(
            "/api/cart",
            get(cart::view),
        )
        .route(
            "/api/cart/items",
            post(cart::add)
                .patch(cart::update_quantity)
                .delete(cart::remove),
        )
        .route("/api/profile", put(profile::save).get(profile::view))
        .route("/api/promo/apply", post(promo::apply))
        .route("/api/checkout/quote", post(checkout::quote))
        .route(
            "/api/checkout/delivery-points",
            get(checkout::delivery_points),
        )
        .route("/api/checkout", post(checkout::place_order))
        .route("/api/orders", get(orders::list))
        .route("/api/orders/{id}", get(orders::detail))
        .route("/api/orders/{id}/status", post(orders::update_status))
        .route(
            "/api/orders/{id}/refresh-status",
            post(orders::refresh_status),
        )
}
