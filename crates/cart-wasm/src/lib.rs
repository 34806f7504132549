//! # cart-wasm
//!
//! WebAssembly bindings for storefront-cart-rs.
//!
//! The browser cart: same merge and cleanup rules as the server, persisted to
//! `window.localStorage` after every change and restored on page load.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCart } from 'storefront-cart-wasm';
//!
//! await init();
//!
//! const cart = new WasmCart();          // restores "cart-storage"
//! cart.add_item(12, 2, "10.50", "Kente Hoodie", null);
//! cart.update_quantity(12, 0);          // removes the line
//!
//! console.log(cart.total_items(), cart.total_price());
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

pub mod storage;

use cart_core::{parse_price, CartError, CartLine, CartStore, Decimal, ProductId, DEFAULT_STORAGE_KEY};
use wasm_bindgen::prelude::*;

pub use storage::LocalStorageSnapshotStore;

fn to_js(err: CartError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn product_id(raw: u32) -> Result<ProductId, JsValue> {
    ProductId::new(u64::from(raw)).map_err(to_js)
}

/// Browser cart backed by localStorage
#[wasm_bindgen]
pub struct WasmCart {
    store: CartStore<LocalStorageSnapshotStore>,
}

#[wasm_bindgen]
impl WasmCart {
    /// Restore the cart saved under `storage_key` (default `cart-storage`)
    #[wasm_bindgen(constructor)]
    pub fn new(storage_key: Option<String>) -> WasmCart {
        let key = storage_key.unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        let store = CartStore::open(LocalStorageSnapshotStore::new(key));
        Self { store }
    }

    /// Add a line, or grow the quantity of an existing one
    pub fn add_item(
        &mut self,
        product_id: u32,
        quantity: u32,
        price: &str,
        name: Option<String>,
        image: Option<String>,
    ) -> Result<(), JsValue> {
        let mut line = CartLine::new(
            self::product_id(product_id)?,
            quantity,
            parse_price(price).map_err(to_js)?,
        );
        line.name = name;
        line.image = image;

        self.store.add_item(line).map_err(to_js)?;
        self.warn_if_unsaved();
        Ok(())
    }

    /// Remove a line; unknown ids are ignored
    pub fn remove_item(&mut self, product_id: u32) -> Result<(), JsValue> {
        self.store.remove_item(self::product_id(product_id)?);
        self.warn_if_unsaved();
        Ok(())
    }

    /// Set a line's quantity; zero or below removes it
    pub fn update_quantity(&mut self, product_id: u32, quantity: i32) -> Result<(), JsValue> {
        self.store
            .update_quantity(self::product_id(product_id)?, i64::from(quantity))
            .map_err(to_js)?;
        self.warn_if_unsaved();
        Ok(())
    }

    /// Empty the cart
    pub fn clear_cart(&mut self) {
        self.store.clear_cart();
        self.warn_if_unsaved();
    }

    /// Total price as a decimal string
    pub fn total_price(&self) -> String {
        self.store.total_price().to_string()
    }

    /// Total quantity across lines, as a JS number
    pub fn total_items(&self) -> f64 {
        count_to_js(self.store.total_items())
    }

    pub fn is_empty(&self) -> bool {
        self.store.cart().is_empty()
    }

    /// Lines as a JSON array
    pub fn lines_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.store.lines()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WasmCart {
    fn warn_if_unsaved(&self) {
        if self.store.is_dirty() {
            web_sys::console::warn_1(&JsValue::from_str(
                "storefront-cart: could not save cart to localStorage, changes are in memory only",
            ));
        }
    }
}

// Exact for counts up to 2^53
fn count_to_js(count: u64) -> f64 {
    count as f64
}

/// Price × quantity for display, `None` if the price does not parse or the
/// product is out of range
#[wasm_bindgen]
pub fn line_total(price: &str, quantity: u32) -> Option<String> {
    parse_price(price)
        .ok()?
        .checked_mul(Decimal::from(quantity))
        .map(|total| total.to_string())
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
