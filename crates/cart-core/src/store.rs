//! # Cart Store
//!
//! The single owner of the client-side cart. Every mutation goes through the
//! `Cart` aggregate and is followed by one synchronous snapshot write.
//!
//! Persistence is best-effort: a failed load starts an empty cart, a failed
//! save leaves the in-memory cart authoritative and marks the store dirty so
//! the next mutation (or `flush`) writes the full snapshot again.

use crate::cart::Cart;
use crate::error::CartResult;
use crate::line::{CartLine, ProductId};
use crate::snapshot::{CartSnapshot, SnapshotStore};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Cart state plus its persistence backend
#[derive(Debug)]
pub struct CartStore<S: SnapshotStore> {
    cart: Cart,
    storage: S,
    dirty: bool,
}

impl<S: SnapshotStore> CartStore<S> {
    /// Rehydrate the cart from storage.
    ///
    /// Never fails: unreadable or corrupt snapshots are logged and the store
    /// starts empty.
    pub fn open(storage: S) -> Self {
        let cart = match storage.load() {
            Ok(Some(snapshot)) => {
                let (cart, normalized) = Cart::from_lines(snapshot.lines);
                if normalized > 0 {
                    warn!(
                        backend = storage.backend_name(),
                        normalized, "Normalized invalid lines in stored cart snapshot"
                    );
                }
                info!(
                    backend = storage.backend_name(),
                    lines = cart.len(),
                    "Restored cart from snapshot"
                );
                cart
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(
                    backend = storage.backend_name(),
                    error = %e,
                    "Failed to load cart snapshot, starting with an empty cart"
                );
                Cart::new()
            }
        };

        Self {
            cart,
            storage,
            dirty: false,
        }
    }

    /// Current cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Cart lines in insertion order
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Snapshot of the current state, for readers outside the store
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::capture(&self.cart)
    }

    /// Persistence backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// True if the last snapshot write failed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Add a line, merging quantities for a product already in the cart
    pub fn add_item(&mut self, line: CartLine) -> CartResult<()> {
        let product_id = line.product_id;
        let quantity = line.quantity;
        self.cart.add_item(line)?;
        debug!(%product_id, quantity, "Added item to cart");
        self.persist(true);
        Ok(())
    }

    /// Remove a product's line; absent ids are a no-op
    pub fn remove_item(&mut self, product_id: ProductId) {
        let changed = self.cart.remove_item(product_id);
        if changed {
            debug!(%product_id, "Removed item from cart");
        }
        self.persist(changed);
    }

    /// Set a product's quantity; zero or below removes the line
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> CartResult<()> {
        let changed = self.cart.update_quantity(product_id, quantity)?;
        if changed {
            debug!(%product_id, quantity, "Updated cart quantity");
        }
        self.persist(changed);
        Ok(())
    }

    /// Empty the cart
    pub fn clear_cart(&mut self) {
        let changed = self.cart.clear();
        if changed {
            debug!("Cleared cart");
        }
        self.persist(changed);
    }

    /// Σ price × quantity
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// Σ quantity
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Write the snapshot now, returning the error instead of swallowing it
    pub fn flush(&mut self) -> CartResult<()> {
        let result = self.storage.save(&self.snapshot());
        self.dirty = result.is_err();
        result
    }

    fn persist(&mut self, changed: bool) {
        if !changed && !self.dirty {
            return;
        }

        if let Err(e) = self.flush() {
            warn!(
                backend = self.storage.backend_name(),
                error = %e,
                "Failed to persist cart snapshot, continuing in memory"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutPayload;
    use crate::error::CartError;
    use crate::snapshot::MemorySnapshotStore;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    fn id(raw: u64) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    /// Store whose reads and writes can be made to fail
    #[derive(Default)]
    struct FlakyStore {
        inner: MemorySnapshotStore,
        fail_load: bool,
        fail_save: AtomicBool,
        saves: AtomicUsize,
    }

    impl SnapshotStore for FlakyStore {
        fn load(&self) -> CartResult<Option<CartSnapshot>> {
            if self.fail_load {
                return Err(CartError::Serialization("truncated".into()));
            }
            self.inner.load()
        }

        fn save(&self, snapshot: &CartSnapshot) -> CartResult<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_save.load(Ordering::SeqCst) {
                return Err(CartError::storage("flaky", "quota exceeded"));
            }
            self.inner.save(snapshot)
        }

        fn backend_name(&self) -> &'static str {
            "flaky"
        }
    }

    #[test]
    fn test_mutations_are_persisted() {
        let storage = Arc::new(MemorySnapshotStore::new());
        let mut store = CartStore::open(storage.clone());

        store.add_item(CartLine::parse(1, 2, "10.50").unwrap()).unwrap();
        store.add_item(CartLine::parse(2, 3, "5.00").unwrap()).unwrap();

        let stored = storage.stored().unwrap();
        assert_eq!(stored.lines.len(), 2);

        store.update_quantity(id(1), 0).unwrap();
        assert_eq!(storage.stored().unwrap().lines.len(), 1);

        store.clear_cart();
        assert!(storage.stored().unwrap().lines.is_empty());
    }

    #[test]
    fn test_rehydrates_after_restart() {
        let storage = Arc::new(MemorySnapshotStore::new());
        {
            let mut store = CartStore::open(storage.clone());
            store.add_item(CartLine::parse(5, 4, "2.25").unwrap()).unwrap();
        }

        let store = CartStore::open(storage);
        assert_eq!(store.total_items(), 4);
        assert_eq!(store.total_price(), Decimal::new(900, 2));
    }

    #[test]
    fn test_accumulates_quantity_with_first_price() {
        let mut store = CartStore::open(MemorySnapshotStore::new());
        for (qty, price) in [(1, "3.00"), (2, "3.50"), (5, "0.99")] {
            store.add_item(CartLine::parse(8, qty, price).unwrap()).unwrap();
        }

        let line = store.cart().get(id(8)).unwrap();
        assert_eq!(line.quantity, 8);
        assert_eq!(line.price, Decimal::new(300, 2));
    }

    #[test]
    fn test_invalid_input_leaves_state_untouched() {
        let mut store = CartStore::open(MemorySnapshotStore::new());
        store.add_item(CartLine::parse(1, 1, "1.00").unwrap()).unwrap();
        let before = store.cart().clone();

        let zero = CartLine::new(id(1), 0, Decimal::ONE);
        assert!(store.add_item(zero).is_err());
        assert_eq!(store.cart(), &before);
    }

    #[test]
    fn test_load_failure_starts_empty() {
        let storage = FlakyStore {
            fail_load: true,
            ..Default::default()
        };
        let store = CartStore::open(storage);

        assert!(store.cart().is_empty());
        assert_eq!(store.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_save_failure_is_soft_and_retried_on_next_mutation() {
        let storage = Arc::new(FlakyStore::default());
        storage.fail_save.store(true, Ordering::SeqCst);
        let mut store = CartStore::open(storage.clone());

        store.add_item(CartLine::parse(1, 1, "1.00").unwrap()).unwrap();
        assert!(store.is_dirty());
        assert_eq!(store.total_items(), 1);
        assert_eq!(storage.saves.load(Ordering::SeqCst), 1);

        storage.fail_save.store(false, Ordering::SeqCst);
        // No-op mutation still writes because the previous save failed
        store.remove_item(id(42));
        assert!(!store.is_dirty());
        assert_eq!(storage.saves.load(Ordering::SeqCst), 2);
        assert_eq!(storage.inner.stored().unwrap().lines.len(), 1);
    }

    #[test]
    fn test_noop_mutations_skip_write() {
        let storage = Arc::new(FlakyStore::default());
        let mut store = CartStore::open(storage.clone());

        store.remove_item(id(1));
        store.update_quantity(id(1), 3).unwrap();
        store.clear_cart();

        assert_eq!(storage.saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clear_twice_equals_once() {
        let mut store = CartStore::open(MemorySnapshotStore::new());
        store.add_item(CartLine::parse(1, 2, "10.50").unwrap()).unwrap();

        store.clear_cart();
        let once = store.cart().clone();
        store.clear_cart();

        assert_eq!(store.cart(), &once);
        assert_eq!(store.total_items(), 0);
        assert_eq!(store.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_normalizes_corrupt_snapshot() {
        let snapshot = CartSnapshot {
            lines: vec![
                CartLine::parse(3, 1, "4.00").unwrap(),
                CartLine::parse(3, 2, "6.00").unwrap(),
            ],
            saved_at: None,
        };
        let store = CartStore::open(MemorySnapshotStore::with_snapshot(snapshot));

        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.total_items(), 3);
        assert_eq!(store.total_price(), Decimal::new(1200, 2));
    }

    #[test]
    fn test_out_of_range_price_is_not_persisted() {
        let storage = Arc::new(FlakyStore::default());
        let mut store = CartStore::open(storage.clone());
        store.add_item(CartLine::parse(1, 1, "1.00").unwrap()).unwrap();

        let huge = CartLine::new(id(2), 2, Decimal::MAX);
        assert!(matches!(
            store.add_item(huge),
            Err(CartError::InvalidPrice { .. })
        ));

        assert_eq!(storage.saves.load(Ordering::SeqCst), 1);
        assert_eq!(storage.inner.stored().unwrap().lines.len(), 1);
        assert_eq!(store.total_price(), Decimal::ONE);
    }

    #[test]
    fn test_snapshot_with_out_of_range_total_loads() {
        let snapshot = CartSnapshot {
            lines: vec![
                CartLine::new(id(1), 1, Decimal::MAX),
                CartLine::new(id(2), 2, Decimal::MAX),
                CartLine::new(id(3), 1, Decimal::MAX),
            ],
            saved_at: None,
        };
        let store = CartStore::open(MemorySnapshotStore::with_snapshot(snapshot));

        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.total_price(), Decimal::MAX);
        assert!(CheckoutPayload::from_cart(store.cart()).is_some());
    }
}
