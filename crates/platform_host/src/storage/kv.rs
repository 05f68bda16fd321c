//! Namespaced key-value storage contract and in-memory adapter.
//!
//! The virtual file system persists node metadata and file payloads through this contract. Two
//! fixed namespaces keep directory listings from ever loading payload bytes.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Backend object-store name holding node metadata records.
pub const METADATA_STORE_NAME: &str = "fileSystem";
/// Backend object-store name holding file payload bytes.
pub const CONTENT_STORE_NAME: &str = "fileContents";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Independent key space within a [`KeyValueStore`].
pub enum StoreNamespace {
    /// Node metadata records keyed by absolute path.
    Metadata,
    /// File payload bytes keyed by the owning file path.
    Content,
}

impl StoreNamespace {
    /// All namespaces a backend must provision during `init`.
    pub const ALL: [StoreNamespace; 2] = [StoreNamespace::Metadata, StoreNamespace::Content];

    /// Returns the stable backend store name for this namespace.
    pub const fn store_name(self) -> &'static str {
        match self {
            Self::Metadata => METADATA_STORE_NAME,
            Self::Content => CONTENT_STORE_NAME,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures reported by [`KeyValueStore`] implementations.
pub enum StoreError {
    /// An operation ran before `init` completed.
    #[error("store not initialized")]
    NotInitialized,
    /// The storage backend rejected or failed the request.
    #[error("storage backend failure: {0}")]
    Backend(String),
    /// A stored record could not be encoded or decoded.
    #[error("record codec failure: {0}")]
    Codec(String),
}

/// Object-safe boxed future used by [`KeyValueStore`] async methods.
pub type KeyValueFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Asynchronous key-value storage with independent namespaces.
pub trait KeyValueStore {
    /// Provisions the backend. Must be idempotent.
    fn init<'a>(&'a self) -> KeyValueFuture<'a, Result<(), StoreError>>;

    /// Loads the raw value for `key`, or `None` when absent.
    fn get<'a>(
        &'a self,
        namespace: StoreNamespace,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<Vec<u8>>, StoreError>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put<'a>(
        &'a self,
        namespace: StoreNamespace,
        key: &'a str,
        value: Vec<u8>,
    ) -> KeyValueFuture<'a, Result<(), StoreError>>;

    /// Removes `key`. Removing an absent key succeeds.
    fn delete<'a>(
        &'a self,
        namespace: StoreNamespace,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<(), StoreError>>;
}

type NamespaceMap = HashMap<StoreNamespace, HashMap<String, Vec<u8>>>;

#[derive(Debug, Clone, Default)]
/// In-memory key-value store. Clones share the same backing maps.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<NamespaceMap>>,
    initialized: Rc<Cell<bool>>,
}

impl MemoryKeyValueStore {
    /// Returns the sorted keys currently stored in `namespace`.
    pub fn keys(&self, namespace: StoreNamespace) -> Vec<String> {
        let mut keys = self
            .inner
            .borrow()
            .get(&namespace)
            .map(|entries| entries.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn ensure_initialized(&self) -> Result<(), StoreError> {
        if self.initialized.get() {
            Ok(())
        } else {
            Err(StoreError::NotInitialized)
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn init<'a>(&'a self) -> KeyValueFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            for namespace in StoreNamespace::ALL {
                inner.entry(namespace).or_default();
            }
            self.initialized.set(true);
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        namespace: StoreNamespace,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<Vec<u8>>, StoreError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            Ok(self
                .inner
                .borrow()
                .get(&namespace)
                .and_then(|entries| entries.get(key).cloned()))
        })
    }

    fn put<'a>(
        &'a self,
        namespace: StoreNamespace,
        key: &'a str,
        value: Vec<u8>,
    ) -> KeyValueFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            self.inner
                .borrow_mut()
                .entry(namespace)
                .or_default()
                .insert(key.to_string(), value);
            Ok(())
        })
    }

    fn delete<'a>(
        &'a self,
        namespace: StoreNamespace,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            if let Some(entries) = self.inner.borrow_mut().get_mut(&namespace) {
                entries.remove(key);
            }
            Ok(())
        })
    }
}

/// Loads and deserializes a JSON record through a [`KeyValueStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store fails or the stored bytes are not a valid record.
pub async fn get_json_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    namespace: StoreNamespace,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(namespace, key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_slice(&raw).map_err(|e| StoreError::Codec(e.to_string()))?;
    Ok(Some(value))
}

/// Serializes and saves a JSON record through a [`KeyValueStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn put_json_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    namespace: StoreNamespace,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_vec(value).map_err(|e| StoreError::Codec(e.to_string()))?;
    store.put(namespace, key, raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        path: String,
    }

    #[test]
    fn operations_before_init_report_not_initialized() {
        let store = MemoryKeyValueStore::default();
        let store_obj: &dyn KeyValueStore = &store;

        assert_eq!(
            block_on(store_obj.get(StoreNamespace::Metadata, "/")),
            Err(StoreError::NotInitialized)
        );
        assert_eq!(
            block_on(store_obj.put(StoreNamespace::Content, "/a", vec![1])),
            Err(StoreError::NotInitialized)
        );
        assert_eq!(
            block_on(store_obj.delete(StoreNamespace::Content, "/a")),
            Err(StoreError::NotInitialized)
        );
    }

    #[test]
    fn init_is_idempotent_and_keeps_existing_values() {
        let store = MemoryKeyValueStore::default();
        block_on(store.init()).expect("init");
        block_on(store.put(StoreNamespace::Metadata, "/", b"root".to_vec())).expect("put");
        block_on(store.init()).expect("second init");

        assert_eq!(
            block_on(store.get(StoreNamespace::Metadata, "/")).expect("get"),
            Some(b"root".to_vec())
        );
    }

    #[test]
    fn namespaces_are_independent() {
        let store = MemoryKeyValueStore::default();
        block_on(store.init()).expect("init");
        block_on(store.put(StoreNamespace::Content, "/a.txt", b"bytes".to_vec())).expect("put");

        assert_eq!(
            block_on(store.get(StoreNamespace::Metadata, "/a.txt")).expect("get"),
            None
        );
        assert_eq!(store.keys(StoreNamespace::Content), vec!["/a.txt".to_string()]);

        block_on(store.delete(StoreNamespace::Content, "/a.txt")).expect("delete");
        block_on(store.delete(StoreNamespace::Content, "/a.txt")).expect("delete absent");
        assert!(store.keys(StoreNamespace::Content).is_empty());
    }

    #[test]
    fn clones_share_backing_state() {
        let store = MemoryKeyValueStore::default();
        let other = store.clone();
        block_on(store.init()).expect("init");
        block_on(other.put(StoreNamespace::Metadata, "/x", vec![7])).expect("put via clone");

        assert_eq!(
            block_on(store.get(StoreNamespace::Metadata, "/x")).expect("get"),
            Some(vec![7])
        );
    }

    #[test]
    fn typed_json_helpers_round_trip_and_report_codec_errors() {
        let store = MemoryKeyValueStore::default();
        block_on(store.init()).expect("init");
        let record = Record {
            path: "/docs".to_string(),
        };
        block_on(put_json_with(&store, StoreNamespace::Metadata, "/docs", &record))
            .expect("put typed");

        let loaded: Option<Record> =
            block_on(get_json_with(&store, StoreNamespace::Metadata, "/docs")).expect("get typed");
        assert_eq!(loaded, Some(record));

        block_on(store.put(StoreNamespace::Metadata, "/bad", b"{not json".to_vec())).expect("put");
        let err = block_on(get_json_with::<_, Record>(
            &store,
            StoreNamespace::Metadata,
            "/bad",
        ))
        .expect_err("decode should fail");
        assert!(matches!(err, StoreError::Codec(_)));
    }

    #[test]
    fn namespace_store_names_match_backend_layout() {
        assert_eq!(StoreNamespace::Metadata.store_name(), "fileSystem");
        assert_eq!(StoreNamespace::Content.store_name(), "fileContents");
    }
}
