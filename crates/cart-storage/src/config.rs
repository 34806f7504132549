//! # Storage Configuration
//!
//! Where the cart snapshot lives on disk.
//! Values are loaded from environment variables (and `.env` if present).

use cart_core::{CartError, CartResult, DEFAULT_STORAGE_KEY};
use std::env;
use std::path::{Path, PathBuf};

/// Default directory for snapshot files
pub const DEFAULT_STORAGE_DIR: &str = ".cart";

/// File snapshot configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding snapshot files
    pub dir: PathBuf,

    /// Storage key; the snapshot file is `<dir>/<key>.json`
    pub key: String,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `CART_STORAGE_DIR` (default `.cart`)
    /// - `CART_STORAGE_KEY` (default `cart-storage`)
    pub fn from_env() -> CartResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let dir = env::var("CART_STORAGE_DIR").unwrap_or_else(|_| DEFAULT_STORAGE_DIR.to_string());
        let key = env::var("CART_STORAGE_KEY").unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string());

        Self::new(dir, key)
    }

    /// Create config with explicit values
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> CartResult<Self> {
        let key = key.into();
        validate_key(&key)?;

        Ok(Self {
            dir: dir.into(),
            key,
        })
    }

    /// Full path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    /// Directory holding the snapshot
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn validate_key(key: &str) -> CartResult<()> {
    if key.trim().is_empty() {
        return Err(CartError::Configuration(
            "CART_STORAGE_KEY must not be empty".to_string(),
        ));
    }

    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(CartError::Configuration(format!(
            "CART_STORAGE_KEY must be a plain name, got {key:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_path() {
        let config = StorageConfig::new("/var/lib/cart", "cart-storage").unwrap();
        assert_eq!(
            config.snapshot_path(),
            PathBuf::from("/var/lib/cart/cart-storage.json")
        );
    }

    #[test]
    fn test_key_validation() {
        assert!(StorageConfig::new(".cart", "").is_err());
        assert!(StorageConfig::new(".cart", "  ").is_err());
        assert!(StorageConfig::new(".cart", "../etc/passwd").is_err());
        assert!(StorageConfig::new(".cart", "a\\b").is_err());
        assert!(StorageConfig::new(".cart", "..").is_err());
        assert!(StorageConfig::new(".cart", "guest-cart").is_ok());
    }

    #[test]
    fn test_bad_key_is_configuration_error() {
        let err = StorageConfig::new(".cart", "").unwrap_err();
        assert!(matches!(err, CartError::Configuration(_)));
    }
}
