//! # Storefront Cart
//!
//! Persisted cart service for the storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Optional environment variables
//! export CART_STORAGE_DIR=/var/lib/storefront-cart
//! export CART_STORAGE_KEY=cart-storage
//! export CART_CATALOG_PATH=config/products.toml
//!
//! # Run the server
//! storefront-cart
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.products.len());
    {
        let cart = state.cart.lock().await;
        info!(
            "Cart restored: {} lines, {} items",
            cart.lines().len(),
            cart.total_items()
        );
    }

    // Create router
    let app = routes::create_router(state);

    info!("Storefront cart starting on http://{}", addr);

    if !is_prod {
        info!("Cart: GET http://{}/api/v1/cart", addr);
        info!("Add item: POST http://{}/api/v1/cart/items", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
