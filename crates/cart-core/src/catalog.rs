//! # Product Catalog
//!
//! Local product catalog used to price cart lines when a caller only knows
//! the product id. Loaded from `config/products.toml`.

use crate::error::{CartError, CartResult};
use crate::line::{CartLine, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// WooCommerce product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price (string in TOML, e.g. `price = "19.99"`)
    pub price: Decimal,

    /// Optional image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Variant attributes copied onto cart lines
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Whether this product is available for purchase
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl CatalogProduct {
    /// Create an active product
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
            attributes: BTreeMap::new(),
            active: true,
        }
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Check the id and price against the rules for cart lines
    pub fn validate(&self) -> CartResult<()> {
        self.to_line(1).validate().map_err(|e| {
            CartError::Configuration(format!("product {} ({}): {e}", self.id, self.name))
        })
    }

    /// Build a cart line for this product
    pub fn to_line(&self, quantity: u32) -> CartLine {
        let mut line = CartLine::new(self.id, quantity, self.price).with_name(self.name.clone());
        line.image = self.image.clone();
        line.attributes = self.attributes.clone();
        line
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: CatalogProduct) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Find a purchasable product, with typed errors for missing / inactive
    pub fn purchasable(&self, id: ProductId) -> CartResult<&CatalogProduct> {
        let product = self.get(id).ok_or(CartError::ProductNotFound {
            product_id: id.get(),
        })?;
        if !product.active {
            return Err(CartError::ProductUnavailable {
                product_id: id.get(),
            });
        }
        Ok(product)
    }

    /// Get all active products
    pub fn active_products(&self) -> impl Iterator<Item = &CatalogProduct> {
        self.products.iter().filter(|p| p.active)
    }

    /// Load catalog from TOML string, rejecting products a cart line could not hold
    pub fn from_toml(toml_str: &str) -> CartResult<Self> {
        let catalog: Self =
            toml::from_str(toml_str).map_err(|e| CartError::Configuration(e.to_string()))?;
        for product in &catalog.products {
            product.validate()?;
        }
        Ok(catalog)
    }
}
