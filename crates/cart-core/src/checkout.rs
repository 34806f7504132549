//! # Checkout Payload
//!
//! What the storefront hands to order creation: the WooCommerce `line_items`
//! shape built from the cart as it is at call time.

use crate::cart::Cart;
use crate::line::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One `line_items` entry for WooCommerce order creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Cart contents ready for order submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutPayload {
    pub line_items: Vec<OrderLineItem>,

    /// Client-side total; the remote store recomputes its own
    pub total: Decimal,

    pub item_count: u64,
}

impl CheckoutPayload {
    /// Build from the current cart; `None` for an empty cart
    pub fn from_cart(cart: &Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        Some(Self {
            line_items: cart
                .lines()
                .iter()
                .map(|l| OrderLineItem {
                    product_id: l.product_id,
                    quantity: l.quantity,
                })
                .collect(),
            total: cart.total_price(),
            item_count: cart.total_items(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::CartLine;

    #[test]
    fn test_empty_cart_has_no_payload() {
        assert!(CheckoutPayload::from_cart(&Cart::new()).is_none());
    }

    #[test]
    fn test_payload_mirrors_cart() {
        let mut cart = Cart::new();
        cart.add_item(CartLine::parse(1, 2, "10.50").unwrap()).unwrap();
        cart.add_item(CartLine::parse(2, 3, "5.00").unwrap()).unwrap();

        let payload = CheckoutPayload::from_cart(&cart).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(payload.item_count, 5);
        assert_eq!(json["total"], "36.00");
        assert_eq!(
            json["line_items"],
            serde_json::json!([
                { "product_id": 1, "quantity": 2 },
                { "product_id": 2, "quantity": 3 }
            ])
        );
    }
}
