//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the one cart store this service owns and the product catalog.

use cart_core::{BoxedSnapshotStore, CartStore, ProductCatalog};
use cart_storage::FileSnapshotStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cart store shared between handlers; the mutex keeps a single writer
pub type SharedCart = Arc<Mutex<CartStore<BoxedSnapshotStore>>>;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit catalog path, overrides the search list
    pub catalog_path: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            catalog_path: std::env::var("CART_CATALOG_PATH").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The cart
    pub cart: SharedCart,
    /// Product catalog
    pub catalog: Arc<ProductCatalog>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the file snapshot store
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        // Load product catalog
        let catalog = load_product_catalog(config.catalog_path.as_deref())?;

        let storage = FileSnapshotStore::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to configure cart storage: {}", e))?;
        tracing::info!(
            "Cart snapshot at {}",
            storage.config().snapshot_path().display()
        );

        Ok(Self::with_storage(config, catalog, Box::new(storage)))
    }

    /// Create state over any snapshot backend
    pub fn with_storage(
        config: AppConfig,
        catalog: ProductCatalog,
        storage: BoxedSnapshotStore,
    ) -> Self {
        Self {
            cart: Arc::new(Mutex::new(CartStore::open(storage))),
            catalog: Arc::new(catalog),
            config,
        }
    }
}

/// Load product catalog from config file
fn load_product_catalog(explicit: Option<&str>) -> anyhow::Result<ProductCatalog> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
        let catalog = ProductCatalog::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
        tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
        return Ok(catalog);
    }

    // Try to load from config/products.toml
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = ProductCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
            return Ok(catalog);
        }
    }

    // Lines can still be added with an explicit price
    tracing::warn!("No product catalog found, using empty catalog");
    Ok(ProductCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::{MemorySnapshotStore, SnapshotStore};

    fn test_config() -> AppConfig {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            catalog_path: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..test_config()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_missing_explicit_catalog_is_error() {
        assert!(load_product_catalog(Some("/nonexistent/products.toml")).is_err());
    }

    #[tokio::test]
    async fn test_with_storage_starts_empty() {
        let state = AppState::with_storage(
            test_config(),
            ProductCatalog::new(),
            Box::new(MemorySnapshotStore::new()),
        );

        let cart = state.cart.lock().await;
        assert!(cart.cart().is_empty());
        assert_eq!(cart.storage().backend_name(), "memory");
    }
}
