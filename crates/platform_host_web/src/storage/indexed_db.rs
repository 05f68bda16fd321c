//! IndexedDB-backed key-value store implementation.

use std::cell::Cell;

use platform_host::{KeyValueFuture, KeyValueStore, StoreError, StoreNamespace};
use serde::{Deserialize, Serialize};

/// Default IndexedDB database name for the virtual file system.
pub const DEFAULT_DATABASE_NAME: &str = "appFilesystem";
/// Schema version passed to `indexedDB.open`.
///
/// Version 1 databases hold object stores keyed in-line by `path`; opening at version 2 replaces
/// them with out-of-line byte stores.
pub const DEFAULT_DATABASE_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Connection settings for [`WebKeyValueStore`].
pub struct IndexedDbConfig {
    /// IndexedDB database name.
    pub database_name: String,
    /// Database schema version.
    pub version: u32,
}

impl Default for IndexedDbConfig {
    fn default() -> Self {
        Self {
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            version: DEFAULT_DATABASE_VERSION,
        }
    }
}

#[derive(Debug, Default)]
/// Browser key-value store backed by IndexedDB, one object store per [`StoreNamespace`].
pub struct WebKeyValueStore {
    config: IndexedDbConfig,
    initialized: Cell<bool>,
}

impl WebKeyValueStore {
    /// Creates a store for the given database settings. Call `init` before use.
    pub fn new(config: IndexedDbConfig) -> Self {
        Self {
            config,
            initialized: Cell::new(false),
        }
    }

    /// Returns the connection settings.
    pub fn config(&self) -> &IndexedDbConfig {
        &self.config
    }

    fn database(&self) -> Result<&str, StoreError> {
        if self.initialized.get() {
            Ok(&self.config.database_name)
        } else {
            Err(StoreError::NotInitialized)
        }
    }
}

impl KeyValueStore for WebKeyValueStore {
    fn init<'a>(&'a self) -> KeyValueFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            if self.initialized.get() {
                return Ok(());
            }
            crate::bridge::kv_init(
                &self.config.database_name,
                self.config.version,
                StoreNamespace::Metadata.store_name(),
                StoreNamespace::Content.store_name(),
            )
            .await
            .map_err(StoreError::Backend)?;
            self.initialized.set(true);
            tracing::info!(database = %self.config.database_name, "IndexedDB store opened");
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        namespace: StoreNamespace,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<Vec<u8>>, StoreError>> {
        Box::pin(async move {
            let database = self.database()?;
            crate::bridge::kv_get(database, namespace.store_name(), key)
                .await
                .map_err(StoreError::Backend)
        })
    }

    fn put<'a>(
        &'a self,
        namespace: StoreNamespace,
        key: &'a str,
        value: Vec<u8>,
    ) -> KeyValueFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let database = self.database()?;
            crate::bridge::kv_put(database, namespace.store_name(), key, &value)
                .await
                .map_err(StoreError::Backend)
        })
    }

    fn delete<'a>(
        &'a self,
        namespace: StoreNamespace,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let database = self.database()?;
            crate::bridge::kv_delete(database, namespace.store_name(), key)
                .await
                .map_err(StoreError::Backend)
        })
    }
}
