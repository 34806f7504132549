//! # Cart Aggregate
//!
//! Ordered, id-unique collection of cart lines. All merge and cleanup rules
//! live here; the store adds persistence around them.

use crate::error::{CartError, CartResult};
use crate::line::{CartLine, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The shopping cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from untrusted lines (e.g. a stored snapshot).
    ///
    /// Lines are replayed through the merge path, so duplicate ids collapse
    /// into the first occurrence. Invalid lines, and lines that would push a
    /// quantity or the total out of range, are dropped. Returns the
    /// cart and the number of lines that were merged or dropped.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> (Self, usize) {
        let mut cart = Self::new();
        let mut normalized = 0;

        for line in lines {
            if line.validate().is_err() {
                normalized += 1;
                continue;
            }
            let duplicate = cart.contains(line.product_id);
            match cart.merged(line) {
                Ok(lines) => {
                    cart.lines = lines;
                    if duplicate {
                        normalized += 1;
                    }
                }
                Err(_) => normalized += 1,
            }
        }

        (cart, normalized)
    }

    /// Lines in insertion order
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find a line by product id
    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Check whether a product is in the cart
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Check if cart is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add a line, merging into an existing line with the same product id.
    ///
    /// On merge only the quantity changes; the existing price and
    /// descriptive fields win over the incoming ones. A merged quantity past
    /// `u32::MAX` or a cart total past `Decimal::MAX` is rejected and the
    /// cart is left as it was.
    pub fn add_item(&mut self, line: CartLine) -> CartResult<()> {
        line.validate()?;
        self.lines = self.merged(line)?;
        Ok(())
    }

    /// The lines this cart would hold after merging `line`
    fn merged(&self, line: CartLine) -> CartResult<Vec<CartLine>> {
        let mut lines = self.lines.clone();

        match lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or(
                    CartError::InvalidQuantity {
                        quantity: i64::from(existing.quantity) + i64::from(line.quantity),
                    },
                )?;
            }
            None => lines.push(line),
        }

        if checked_total(&lines).is_none() {
            return Err(CartError::InvalidPrice {
                message: "cart total is out of range".to_string(),
            });
        }
        Ok(lines)
    }

    /// Remove the line for a product. Returns true if a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Set a line's quantity absolutely.
    ///
    /// A quantity of zero or below removes the line. A quantity that would push
    /// the cart total out of range is rejected. Returns true if the cart changed.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> CartResult<bool> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let quantity =
            u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity { quantity })?;

        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) if line.quantity != quantity => line.quantity = quantity,
            _ => return Ok(false),
        }

        if checked_total(&lines).is_none() {
            return Err(CartError::InvalidQuantity {
                quantity: i64::from(quantity),
            });
        }
        self.lines = lines;
        Ok(true)
    }

    /// Remove every line. Returns true if the cart was non-empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }

    /// Σ price × quantity
    pub fn total_price(&self) -> Decimal {
        // Every mutation keeps the total in range, so this never saturates
        checked_total(&self.lines).unwrap_or(Decimal::MAX)
    }

    /// Σ quantity
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

fn checked_total(lines: &[CartLine]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.total()?))
}
