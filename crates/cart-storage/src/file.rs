//! # File Snapshot Store
//!
//! Keeps the cart snapshot as a JSON file. Writes go to a temp file in the
//! same directory and are renamed over the snapshot, so a crash mid-write
//! leaves the previous snapshot intact.

use crate::config::StorageConfig;
use cart_core::{CartError, CartResult, CartSnapshot, SnapshotStore};
use std::fs;
use std::io::ErrorKind;
use tracing::{debug, instrument};
use uuid::Uuid;

/// JSON file snapshot backend
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    config: StorageConfig,
}

impl FileSnapshotStore {
    /// Create a new file store
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables
    pub fn from_env() -> CartResult<Self> {
        let config = StorageConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Storage configuration
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

impl SnapshotStore for FileSnapshotStore {
    #[instrument(skip(self), fields(path = %self.config.snapshot_path().display()))]
    fn load(&self) -> CartResult<Option<CartSnapshot>> {
        let path = self.config.snapshot_path();

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cart snapshot on disk");
                return Ok(None);
            }
            Err(e) => return Err(CartError::storage(self.backend_name(), e)),
        };

        CartSnapshot::from_json(&json).map(Some)
    }

    #[instrument(skip(self, snapshot), fields(lines = snapshot.lines.len()))]
    fn save(&self, snapshot: &CartSnapshot) -> CartResult<()> {
        let json = snapshot.to_json()?;

        fs::create_dir_all(self.config.dir())
            .map_err(|e| CartError::storage(self.backend_name(), e))?;

        let tmp = self
            .config
            .dir()
            .join(format!(".{}.{}.tmp", self.config.key, Uuid::new_v4()));

        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(CartError::storage(self.backend_name(), e));
        }

        if let Err(e) = fs::rename(&tmp, self.config.snapshot_path()) {
            let _ = fs::remove_file(&tmp);
            return Err(CartError::storage(self.backend_name(), e));
        }

        debug!("Wrote cart snapshot");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::{CartLine, CartStore, Decimal};
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("cart-storage-test-{}", Uuid::new_v4()))
    }

    fn store_in(dir: &PathBuf) -> FileSnapshotStore {
        FileSnapshotStore::new(StorageConfig::new(dir, "cart-storage").unwrap())
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = scratch_dir();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload_across_stores() {
        let dir = scratch_dir();

        {
            let mut cart = CartStore::open(store_in(&dir));
            cart.add_item(CartLine::parse(1, 2, "10.50").unwrap().with_name("Hoodie"))
                .unwrap();
            cart.add_item(CartLine::parse(2, 3, "5.00").unwrap()).unwrap();
            assert!(!cart.is_dirty());
        }

        let cart = CartStore::open(store_in(&dir));
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), Decimal::new(3600, 2));
        assert_eq!(cart.lines()[0].name.as_deref(), Some("Hoodie"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = scratch_dir();
        let store = store_in(&dir);

        store.save(&CartSnapshot::default()).unwrap();
        store.save(&CartSnapshot::default()).unwrap();

        let names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["cart-storage.json".to_string()]);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cart-storage.json"), "{\"lines\": [").unwrap();

        let err = store_in(&dir).load().unwrap_err();
        assert!(matches!(err, CartError::Serialization(_)));

        // The cart store falls back to an empty cart
        let cart = CartStore::open(store_in(&dir));
        assert!(cart.cart().is_empty());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_unwritable_dir_is_soft_failure() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        // A regular file where the storage directory should be
        let blocker = dir.join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let mut cart = CartStore::open(store_in(&blocker));
        cart.add_item(CartLine::parse(3, 1, "1.00").unwrap()).unwrap();

        assert!(cart.is_dirty());
        assert_eq!(cart.total_items(), 1);
        assert!(cart.flush().unwrap_err().is_persistence());

        let _ = fs::remove_dir_all(dir);
    }
}
