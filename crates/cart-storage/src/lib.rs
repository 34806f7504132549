//! # cart-storage
//!
//! Durable snapshot backends for storefront-cart-rs.
//!
//! `FileSnapshotStore` keeps the cart as `<CART_STORAGE_DIR>/<CART_STORAGE_KEY>.json`
//! and replaces it atomically on every write.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cart_core::{CartLine, CartStore};
//! use cart_storage::FileSnapshotStore;
//!
//! // Reads CART_STORAGE_DIR / CART_STORAGE_KEY (and .env)
//! let storage = FileSnapshotStore::from_env()?;
//!
//! // Rehydrates whatever was saved last time
//! let mut cart = CartStore::open(storage);
//! cart.add_item(CartLine::parse(42, 1, "19.99")?)?;
//! # Ok::<(), cart_core::CartError>(())
//! ```

pub mod config;
pub mod file;

// Re-exports
pub use config::{StorageConfig, DEFAULT_STORAGE_DIR};
pub use file::FileSnapshotStore;
