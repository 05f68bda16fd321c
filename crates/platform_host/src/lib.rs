//! Typed host-domain contracts for the desktop simulator.
//!
//! This crate is the API-first boundary for storage and the virtual file system. It exposes the
//! namespaced [`KeyValueStore`] contract with an in-memory adapter, the [`VirtualFileSystem`]
//! built on top of it, and the [`ObservableFileSystem`] facade that announces directory changes.
//! Concrete browser storage lives in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod storage;

pub use fs::error::FsError;
pub use fs::observable::ObservableFileSystem;
pub use fs::observer::{ChangeNotifier, ObserverCallback};
pub use fs::path::{parent_path, validate_child_path, validate_path, ROOT_PATH};
pub use fs::service::{FileSystemService, FsFuture, VirtualFileSystem};
pub use fs::types::{FsEvent, FsNode, NodeKind, RenamedNode, WriteOutcome};
pub use storage::kv::{
    get_json_with, put_json_with, KeyValueFuture, KeyValueStore, MemoryKeyValueStore,
    StoreError, StoreNamespace, CONTENT_STORE_NAME, METADATA_STORE_NAME,
};
