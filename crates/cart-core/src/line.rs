//! # Cart Line Types
//!
//! One product entry in the cart: identifier, quantity and unit price, plus
//! descriptive fields the store carries without interpreting.

use crate::error::{CartError, CartResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// WooCommerce product identifier.
///
/// Product ids start at 1; zero is treated as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Validate and wrap a raw identifier
    pub fn new(raw: u64) -> CartResult<Self> {
        if raw == 0 {
            return Err(CartError::InvalidProductId {
                product_id: raw.to_string(),
            });
        }
        Ok(Self(raw))
    }

    /// Get the raw identifier
    pub fn get(&self) -> u64 {
        self.0
    }

    /// True unless this id came from an unchecked source (e.g. a stored snapshot) holding zero
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u64>()
            .map_err(|_| CartError::InvalidProductId {
                product_id: s.to_string(),
            })?;
        Self::new(raw)
    }
}

/// Parse a numeric-string price into a decimal.
///
/// Accepts the WooCommerce string form ("10.50", "5"). Negative amounts are rejected.
pub fn parse_price(price: &str) -> CartResult<Decimal> {
    let amount = price
        .trim()
        .parse::<Decimal>()
        .map_err(|e| CartError::InvalidPrice {
            message: format!("{price:?}: {e}"),
        })?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CartError::InvalidPrice {
            message: format!("{price:?} is negative"),
        });
    }

    Ok(amount)
}

/// A product line in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (unique within a cart)
    pub product_id: ProductId,

    /// Quantity, always positive once the line is in a cart
    pub quantity: u32,

    /// Unit price when the line was first added, serialized as a string
    pub price: Decimal,

    /// Product name (denormalized for display)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Variant attributes (size, colour, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl CartLine {
    /// Create a line with no descriptive fields
    pub fn new(product_id: ProductId, quantity: u32, price: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            price,
            name: None,
            image: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Create a line from raw boundary values, validating all three
    pub fn parse(product_id: u64, quantity: u32, price: &str) -> CartResult<Self> {
        let line = Self::new(ProductId::new(product_id)?, quantity, parse_price(price)?);
        line.validate()?;
        Ok(line)
    }

    /// Builder: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Builder: add a variant attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Check the invariants a line must satisfy before entering a cart
    pub fn validate(&self) -> CartResult<()> {
        if !self.product_id.is_valid() {
            return Err(CartError::InvalidProductId {
                product_id: self.product_id.to_string(),
            });
        }
        if self.quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity: 0 });
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(CartError::InvalidPrice {
                message: format!("{} is negative", self.price),
            });
        }
        if self.total().is_none() {
            return Err(CartError::InvalidPrice {
                message: format!("{} x {} is out of range", self.price, self.quantity),
            });
        }
        Ok(())
    }

    /// Price × quantity, `None` if the product does not fit in a `Decimal`
    pub fn total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}
