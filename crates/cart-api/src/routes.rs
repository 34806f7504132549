//! # Routes
//!
//! Axum router configuration for the cart API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Cart:
///   - GET    /api/v1/cart - Current cart and totals
///   - DELETE /api/v1/cart - Clear the cart
///   - POST   /api/v1/cart/items - Add (or merge) a line
///   - PUT    /api/v1/cart/items/{product_id} - Set quantity
///   - DELETE /api/v1/cart/items/{product_id} - Remove a line
///   - GET    /api/v1/cart/checkout - Order line items for checkout
///
/// - Catalog:
///   - GET /api/v1/products - List active products
///   - GET /api/v1/products/{product_id} - Get product by ID
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cart_routes = Router::new()
        .route("/", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/items", post(handlers::add_item))
        .route(
            "/items/{product_id}",
            put(handlers::update_quantity).delete(handlers::remove_item),
        )
        .route("/checkout", get(handlers::checkout_payload));

    let product_routes = Router::new()
        .route("/", get(handlers::list_products))
        .route("/{product_id}", get(handlers::get_product));

    let api_routes = Router::new()
        .nest("/cart", cart_routes)
        .nest("/products", product_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}
