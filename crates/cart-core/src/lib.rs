//! # cart-core
//!
//! Core types and the cart store for storefront-cart-rs.
//!
//! This crate provides:
//! - `CartLine` and `ProductId` for cart entries
//! - `Cart`, the id-unique, insertion-ordered aggregate
//! - `CartStore`, the persisted owner of a cart
//! - `SnapshotStore` trait for persistence backends, with `MemorySnapshotStore`
//! - `ProductCatalog` for pricing lines by id
//! - `CheckoutPayload` for order submission
//! - `CartError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use cart_core::{CartLine, CartStore, MemorySnapshotStore, ProductId};
//!
//! let mut store = CartStore::open(MemorySnapshotStore::new());
//!
//! store.add_item(CartLine::parse(1, 2, "10.50")?)?;
//! store.add_item(CartLine::parse(2, 3, "5.00")?)?;
//!
//! assert_eq!(store.total_items(), 5);
//! assert_eq!(store.total_price().to_string(), "36.00");
//!
//! store.update_quantity(ProductId::new(1)?, 0)?;
//! assert_eq!(store.total_items(), 3);
//! # Ok::<(), cart_core::CartError>(())
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod line;
pub mod snapshot;
pub mod store;

// Re-exports for convenience
pub use cart::Cart;
pub use catalog::{CatalogProduct, ProductCatalog};
pub use checkout::{CheckoutPayload, OrderLineItem};
pub use error::{CartError, CartResult};
pub use line::{parse_price, CartLine, ProductId};
pub use rust_decimal::Decimal;
pub use snapshot::{
    BoxedSnapshotStore, CartSnapshot, MemorySnapshotStore, SnapshotStore, DEFAULT_STORAGE_KEY,
};
pub use store::CartStore;
