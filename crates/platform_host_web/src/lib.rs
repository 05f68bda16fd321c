//! Browser (`wasm32`) implementations of [`platform_host`] storage contracts.
//!
//! The IndexedDB interop lives in `bridge`, which also carries a non-WASM shim so the crate
//! builds and tests natively; on native targets every backend call reports the store as
//! unavailable.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod bridge;
pub mod storage;

pub use storage::indexed_db::{
    IndexedDbConfig, WebKeyValueStore, DEFAULT_DATABASE_NAME, DEFAULT_DATABASE_VERSION,
};
