//! # Cart Error Types
//!
//! Typed error handling for the storefront cart.
//! Store operations return `Result<T, CartError>` for input validation;
//! persistence errors are reported here too but the store itself never
//! propagates them out of a mutation.

use thiserror::Error;

/// Core error type for all cart operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Product identifier is malformed (zero or unparseable)
    #[error("Invalid product id: {product_id}")]
    InvalidProductId { product_id: String },

    /// Quantity outside the accepted range
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// Price string could not be parsed, or is negative
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: u64 },

    /// Product exists but is not available for purchase
    #[error("Product is not available: {product_id}")]
    ProductUnavailable { product_id: u64 },

    /// Snapshot backend could not be read or written
    #[error("Storage error [{backend}]: {message}")]
    Storage { backend: String, message: String },

    /// Snapshot could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors (bad storage key, unreadable catalog)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CartError {
    /// Build a storage error for the named backend
    pub fn storage(backend: impl Into<String>, message: impl ToString) -> Self {
        CartError::Storage {
            backend: backend.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if this error came from the persistence layer.
    ///
    /// The store treats these as non-fatal and keeps running in memory.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            CartError::Storage { .. } | CartError::Serialization(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartError::InvalidProductId { .. } => 400,
            CartError::InvalidQuantity { .. } => 400,
            CartError::InvalidPrice { .. } => 400,
            CartError::ProductNotFound { .. } => 404,
            CartError::ProductUnavailable { .. } => 400,
            CartError::Storage { .. } => 503,
            CartError::Serialization(_) => 500,
            CartError::Configuration(_) => 500,
        }
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;
