//! # cart-api
//!
//! HTTP API layer for storefront-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server owning one persisted cart
//! - REST endpoints for cart operations and the product catalog
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/cart` | Cart and totals |
//! | DELETE | `/api/v1/cart` | Clear cart |
//! | POST | `/api/v1/cart/items` | Add item |
//! | PUT | `/api/v1/cart/items/{id}` | Set quantity |
//! | DELETE | `/api/v1/cart/items/{id}` | Remove item |
//! | GET | `/api/v1/cart/checkout` | Checkout payload |
//! | GET | `/api/v1/products` | List products |
//! | GET | `/api/v1/products/{id}` | Get product |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, SharedCart};
