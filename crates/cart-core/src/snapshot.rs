//! # Cart Snapshots
//!
//! The persisted form of a cart and the `SnapshotStore` seam backends implement.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            SnapshotStore (trait)             │
//! │  ├── load()                                  │
//! │  ├── save(snapshot)                          │
//! │  └── backend_name()                          │
//! └──────────────────────────────────────────────┘
//!                       ▲
//!        ┌──────────────┼──────────────┐
//!        │              │              │
//! ┌──────┴──────┐ ┌─────┴─────┐ ┌──────┴───────┐
//! │   Memory    │ │   File    │ │ LocalStorage │
//! │ (cart-core) │ │ (storage) │ │    (wasm)    │
//! └─────────────┘ └───────────┘ └──────────────┘
//! ```

use crate::cart::Cart;
use crate::error::{CartError, CartResult};
use crate::line::CartLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Default storage key for the cart snapshot
pub const DEFAULT_STORAGE_KEY: &str = "cart-storage";

/// Serialized cart record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Cart lines in insertion order
    #[serde(default)]
    pub lines: Vec<CartLine>,

    /// When the snapshot was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl CartSnapshot {
    /// Capture the current state of a cart
    pub fn capture(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            saved_at: Some(Utc::now()),
        }
    }

    /// Encode as JSON
    pub fn to_json(&self) -> CartResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON, ignoring unknown fields
    pub fn from_json(json: &str) -> CartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Persistence seam for the cart store.
///
/// A single-slot store: `save` overwrites whatever was there.
pub trait SnapshotStore {
    /// Load the stored snapshot, `Ok(None)` if nothing was saved yet
    fn load(&self) -> CartResult<Option<CartSnapshot>>;

    /// Save a snapshot, replacing any previous one
    fn save(&self, snapshot: &CartSnapshot) -> CartResult<()>;

    /// Backend name (for logging)
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a boxed snapshot store shared across threads
pub type BoxedSnapshotStore = Box<dyn SnapshotStore + Send + Sync>;

impl<T: SnapshotStore + ?Sized> SnapshotStore for Box<T> {
    fn load(&self) -> CartResult<Option<CartSnapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartSnapshot) -> CartResult<()> {
        (**self).save(snapshot)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<T> {
    fn load(&self) -> CartResult<Option<CartSnapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartSnapshot) -> CartResult<()> {
        (**self).save(snapshot)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

/// In-memory snapshot store, for tests and for running without durable storage
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<CartSnapshot>>,
}

impl MemorySnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with a snapshot
    pub fn with_snapshot(snapshot: CartSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    /// Peek at the stored snapshot
    pub fn stored(&self) -> Option<CartSnapshot> {
        self.snapshot.lock().ok().and_then(|s| s.clone())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> CartResult<Option<CartSnapshot>> {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .map_err(|_| CartError::storage(self.backend_name(), "lock poisoned"))
    }

    fn save(&self, snapshot: &CartSnapshot) -> CartResult<()> {
        let mut slot = self
            .snapshot
            .lock()
            .map_err(|_| CartError::storage(self.backend_name(), "lock poisoned"))?;
        *slot = Some(snapshot.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::CartLine;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            CartLine::parse(1, 2, "10.50")
                .unwrap()
                .with_name("Hoodie")
                .with_image("https://shop.test/hoodie.jpg")
                .with_attribute("size", "L"),
        )
        .unwrap();
        cart.add_item(CartLine::parse(2, 3, "5.00").unwrap()).unwrap();
        cart
    }

    #[test]
    fn test_round_trip() {
        let cart = sample_cart();
        let snapshot = CartSnapshot::capture(&cart);

        let decoded = CartSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        let (restored, normalized) = Cart::from_lines(decoded.lines.clone());

        assert_eq!(decoded, snapshot);
        assert_eq!(normalized, 0);
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_tolerates_unknown_and_missing_fields() {
        let json = r#"{"version":3,"lines":[{"product_id":4,"quantity":1,"price":"2.50","sku":"X"}]}"#;
        let snapshot = CartSnapshot::from_json(json).unwrap();

        assert_eq!(snapshot.lines.len(), 1);
        assert!(snapshot.saved_at.is_none());

        let empty = CartSnapshot::from_json("{}").unwrap();
        assert!(empty.lines.is_empty());
    }

    #[test]
    fn test_corrupt_json_is_serialization_error() {
        let err = CartSnapshot::from_json("{not json").unwrap_err();
        assert!(matches!(err, CartError::Serialization(_)));
        assert!(err.is_persistence());
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemorySnapshotStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&CartSnapshot::capture(&sample_cart())).unwrap();
        store.save(&CartSnapshot::default()).unwrap();

        assert!(store.load().unwrap().unwrap().lines.is_empty());
    }
}
