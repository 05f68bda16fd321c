//! File-system boot for the desktop shell.
//!
//! Opens the key-value store, then initializes the virtual file system on top of it, and hands
//! back the notifying facade the shell and its apps share.

use std::rc::Rc;

use platform_host::{
    FileSystemService, FsError, KeyValueStore, ObservableFileSystem, StoreError, VirtualFileSystem,
};
use platform_host_web::{IndexedDbConfig, WebKeyValueStore};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Boot failure, tagged with the stage that failed.
pub enum BootError {
    /// The key-value store could not be opened.
    #[error("failed to open the key-value store: {0}")]
    Store(StoreError),
    /// The store opened but the file-system root could not be prepared.
    #[error("failed to initialize the file system: {0}")]
    FileSystem(FsError),
}

/// Opens `store` and returns a ready file system with an empty observer registry.
pub async fn boot_file_system(
    store: Rc<dyn KeyValueStore>,
) -> Result<ObservableFileSystem, BootError> {
    tracing::info!("opening key-value store");
    store.init().await.map_err(|err| {
        tracing::warn!(error = %err, "key-value store failed to open");
        BootError::Store(err)
    })?;

    let fs = ObservableFileSystem::new(VirtualFileSystem::new(store));
    fs.init().await.map_err(|err| {
        tracing::warn!(error = %err, "file system failed to initialize");
        BootError::FileSystem(err)
    })?;
    tracing::info!("file system ready");
    Ok(fs)
}

/// Boots the file system on the browser's IndexedDB store.
pub async fn boot_browser_file_system(
    config: IndexedDbConfig,
) -> Result<ObservableFileSystem, BootError> {
    boot_file_system(Rc::new(WebKeyValueStore::new(config))).await
}
