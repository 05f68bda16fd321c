//! IndexedDB bridge for the browser key-value store.
//!
//! This module contains the WASM/JS interop layer and a non-WASM fallback shim that reports the
//! backend as unavailable.

#[cfg(target_arch = "wasm32")]
mod imp {
    use js_sys::{Promise, Uint8Array};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    #[wasm_bindgen(inline_js = r#"
const connections = new Map();

function fail(message) {
  throw new Error(message);
}

function idbSupported() {
  return typeof indexedDB !== 'undefined';
}

function requestToPromise(req) {
  return new Promise((resolve, reject) => {
    req.onsuccess = () => resolve(req.result);
    req.onerror = () => reject(req.error || new Error('IndexedDB request failed'));
  });
}

function txDone(tx) {
  return new Promise((resolve, reject) => {
    tx.oncomplete = () => resolve();
    tx.onabort = () => reject(tx.error || new Error('IndexedDB transaction aborted'));
    tx.onerror = () => reject(tx.error || new Error('IndexedDB transaction error'));
  });
}

async function openDb(dbName, version, storeNames) {
  if (!idbSupported()) {
    fail('IndexedDB is unavailable in this browser context');
  }
  if (connections.has(dbName)) {
    return connections.get(dbName);
  }
  const db = await new Promise((resolve, reject) => {
    const req = indexedDB.open(dbName, version);
    req.onupgradeneeded = () => {
      const upgrading = req.result;
      const tx = req.transaction;
      for (const name of storeNames) {
        // Stores keyed in-line by `path` are replaced: they reject out-of-line byte values.
        if (upgrading.objectStoreNames.contains(name)) {
          if (tx.objectStore(name).keyPath === null) {
            continue;
          }
          upgrading.deleteObjectStore(name);
        }
        upgrading.createObjectStore(name);
      }
    };
    req.onsuccess = () => resolve(req.result);
    req.onerror = () => reject(req.error || new Error('Failed to open IndexedDB'));
  });
  connections.set(dbName, db);
  return db;
}

function connection(dbName) {
  const db = connections.get(dbName);
  if (!db) {
    fail('Database not initialized');
  }
  return db;
}

async function withStore(dbName, storeName, mode, fn) {
  const tx = connection(dbName).transaction(storeName, mode);
  const store = tx.objectStore(storeName);
  const result = await fn(store);
  await txDone(tx);
  return result;
}

export async function jsKvInit(dbName, version, metadataStore, contentStore) {
  await openDb(dbName, version, [metadataStore, contentStore]);
  return null;
}

export async function jsKvGet(dbName, storeName, key) {
  return await withStore(dbName, storeName, 'readonly', async (store) => {
    const value = await requestToPromise(store.get(key));
    return value === undefined ? null : value;
  });
}

export async function jsKvPut(dbName, storeName, key, bytes) {
  const copy = new Uint8Array(bytes);
  return await withStore(dbName, storeName, 'readwrite', async (store) => {
    await requestToPromise(store.put(copy, key));
    return null;
  });
}

export async function jsKvDelete(dbName, storeName, key) {
  return await withStore(dbName, storeName, 'readwrite', async (store) => {
    await requestToPromise(store.delete(key));
    return null;
  });
}
"#)]
    extern "C" {
        #[wasm_bindgen(js_name = jsKvInit)]
        fn js_kv_init(db_name: &str, version: u32, metadata_store: &str, content_store: &str)
            -> Promise;
        #[wasm_bindgen(js_name = jsKvGet)]
        fn js_kv_get(db_name: &str, store_name: &str, key: &str) -> Promise;
        #[wasm_bindgen(js_name = jsKvPut)]
        fn js_kv_put(db_name: &str, store_name: &str, key: &str, bytes: &[u8]) -> Promise;
        #[wasm_bindgen(js_name = jsKvDelete)]
        fn js_kv_delete(db_name: &str, store_name: &str, key: &str) -> Promise;
    }

    async fn await_promise(promise: Promise) -> Result<JsValue, String> {
        JsFuture::from(promise).await.map_err(js_error_to_string)
    }

    fn js_error_to_string(err: JsValue) -> String {
        if let Some(text) = err.as_string() {
            return text;
        }
        if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
            if let Some(text) = message.as_string() {
                return text;
            }
        }
        format!("{err:?}")
    }

    pub async fn kv_init(
        db_name: &str,
        version: u32,
        metadata_store: &str,
        content_store: &str,
    ) -> Result<(), String> {
        let _ = await_promise(js_kv_init(db_name, version, metadata_store, content_store)).await?;
        Ok(())
    }

    pub async fn kv_get(db_name: &str, store_name: &str, key: &str) -> Result<Option<Vec<u8>>, String> {
        let value = await_promise(js_kv_get(db_name, store_name, key)).await?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        value
            .dyn_into::<Uint8Array>()
            .map(|bytes| Some(bytes.to_vec()))
            .map_err(|_| format!("IndexedDB store `{store_name}` returned a non-binary value"))
    }

    pub async fn kv_put(
        db_name: &str,
        store_name: &str,
        key: &str,
        bytes: &[u8],
    ) -> Result<(), String> {
        let _ = await_promise(js_kv_put(db_name, store_name, key, bytes)).await?;
        Ok(())
    }

    pub async fn kv_delete(db_name: &str, store_name: &str, key: &str) -> Result<(), String> {
        let _ = await_promise(js_kv_delete(db_name, store_name, key)).await?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    fn unsupported() -> String {
        "IndexedDB is only available when compiled for wasm32".to_string()
    }

    pub async fn kv_init(
        _db_name: &str,
        _version: u32,
        _metadata_store: &str,
        _content_store: &str,
    ) -> Result<(), String> {
        Err(unsupported())
    }

    pub async fn kv_get(
        _db_name: &str,
        _store_name: &str,
        _key: &str,
    ) -> Result<Option<Vec<u8>>, String> {
        Err(unsupported())
    }

    pub async fn kv_put(
        _db_name: &str,
        _store_name: &str,
        _key: &str,
        _bytes: &[u8],
    ) -> Result<(), String> {
        Err(unsupported())
    }

    pub async fn kv_delete(_db_name: &str, _store_name: &str, _key: &str) -> Result<(), String> {
        Err(unsupported())
    }
}

pub use imp::{kv_delete, kv_get, kv_init, kv_put};
