//! Hierarchical file-system service contract and its key-value-backed implementation.

use std::{cell::Cell, future::Future, pin::Pin, rc::Rc};

use futures::lock::Mutex;

use super::error::FsError;
use super::path::{parent_path, validate_child_path, validate_path, ROOT_PATH};
use super::types::{FsNode, NodeKind, RenamedNode, WriteOutcome};
use crate::storage::kv::{get_json_with, put_json_with, KeyValueStore, StoreNamespace};

/// Object-safe boxed future used by [`FileSystemService`] async methods.
pub type FsFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Operation set of the hierarchical file store.
pub trait FileSystemService {
    /// Initializes the backing store and ensures the root folder exists. Idempotent.
    fn init<'a>(&'a self) -> FsFuture<'a, Result<(), FsError>>;

    /// Creates a node under an existing parent folder and returns it.
    fn create_node<'a>(
        &'a self,
        path: &'a str,
        kind: NodeKind,
    ) -> FsFuture<'a, Result<FsNode, FsError>>;

    /// Returns whether a node exists at `path`.
    fn node_exists<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<bool, FsError>>;

    /// Loads the node stored at `path`.
    fn get_node<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<Option<FsNode>, FsError>>;

    /// Replaces the node at `old_path` with a fresh node of the same kind at `new_path`.
    ///
    /// Descendants and file content of the old node are deleted, not moved.
    fn rename_node<'a>(
        &'a self,
        old_path: &'a str,
        new_path: &'a str,
    ) -> FsFuture<'a, Result<RenamedNode, FsError>>;

    /// Deletes a node and, for folders, every descendant. Returns the node as it was.
    fn delete_node<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<FsNode, FsError>>;

    /// Reads the payload of a file. `None` when the file was never written.
    fn open_file<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<Option<Vec<u8>>, FsError>>;

    /// Stores `payload` as the content of the file at `path`, creating the file if needed.
    fn write_file<'a>(
        &'a self,
        path: &'a str,
        payload: &'a [u8],
    ) -> FsFuture<'a, Result<WriteOutcome, FsError>>;

    /// Lists the children of a folder in insertion order.
    fn list_directory<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<Vec<FsNode>, FsError>>;
}

/// File system persisted through a [`KeyValueStore`].
///
/// Node records live in [`StoreNamespace::Metadata`] and payloads in
/// [`StoreNamespace::Content`]. A parent's child list is updated with a read/append/write cycle
/// that is not atomic at the store level, so structural mutations are serialized through a
/// tree-wide async lock.
pub struct VirtualFileSystem {
    store: Rc<dyn KeyValueStore>,
    initialized: Cell<bool>,
    structure: Mutex<()>,
}

impl VirtualFileSystem {
    /// Wraps `store`. Call [`FileSystemService::init`] before any other operation.
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            initialized: Cell::new(false),
            structure: Mutex::new(()),
        }
    }

    /// Returns whether [`FileSystemService::init`] has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    fn ensure_initialized(&self) -> Result<(), FsError> {
        if self.initialized.get() {
            Ok(())
        } else {
            Err(FsError::NotInitialized)
        }
    }

    async fn load_node(&self, path: &str) -> Result<Option<FsNode>, FsError> {
        Ok(get_json_with(self.store.as_ref(), StoreNamespace::Metadata, path).await?)
    }

    async fn save_node(&self, node: &FsNode) -> Result<(), FsError> {
        Ok(put_json_with(self.store.as_ref(), StoreNamespace::Metadata, &node.path, node).await?)
    }

    async fn load_folder(&self, path: &str) -> Result<FsNode, FsError> {
        match self.load_node(path).await? {
            Some(node) if node.is_folder() => Ok(node),
            Some(_) => Err(FsError::wrong_kind(path, NodeKind::Folder)),
            None => Err(FsError::not_found(path)),
        }
    }

    // Child record is written before the parent references it: an interrupted create leaves an
    // orphan, never a dangling child path.
    async fn create_unlocked(&self, path: &str, kind: NodeKind) -> Result<FsNode, FsError> {
        validate_child_path(path)?;
        let mut parent = self.load_folder(parent_path(path)).await?;
        if self.load_node(path).await?.is_some() {
            return Err(FsError::AlreadyExists {
                path: path.to_string(),
                kind,
            });
        }

        let node = FsNode::new(path, kind);
        self.save_node(&node).await?;
        parent
            .children
            .get_or_insert_with(Vec::new)
            .push(path.to_string());
        self.save_node(&parent).await?;

        tracing::debug!(path, %kind, "created node");
        Ok(node)
    }

    fn delete_unlocked<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<FsNode, FsError>> {
        Box::pin(async move {
            if path == ROOT_PATH {
                return Err(FsError::invalid_path(path, "root cannot be deleted"));
            }
            let node = self
                .load_node(path)
                .await?
                .ok_or_else(|| FsError::not_found(path))?;

            for child in node.child_paths() {
                if self.load_node(child).await?.is_none() {
                    tracing::warn!(parent = path, child = %child, "dropping missing child");
                    continue;
                }
                self.delete_unlocked(child).await?;
            }

            if let Some(mut parent) = self.load_node(parent_path(path)).await? {
                if let Some(children) = parent.children.as_mut() {
                    children.retain(|child| child != path);
                }
                self.save_node(&parent).await?;
            }

            self.store.delete(StoreNamespace::Metadata, path).await?;
            if node.is_file() {
                self.store.delete(StoreNamespace::Content, path).await?;
            }

            tracing::debug!(path, kind = %node.kind, "deleted node");
            Ok(node)
        })
    }
}

impl FileSystemService for VirtualFileSystem {
    fn init<'a>(&'a self) -> FsFuture<'a, Result<(), FsError>> {
        Box::pin(async move {
            self.store.init().await?;
            if self.load_node(ROOT_PATH).await?.is_none() {
                self.save_node(&FsNode::folder(ROOT_PATH)).await?;
                tracing::info!("created root folder in empty store");
            }
            self.initialized.set(true);
            Ok(())
        })
    }

    fn create_node<'a>(
        &'a self,
        path: &'a str,
        kind: NodeKind,
    ) -> FsFuture<'a, Result<FsNode, FsError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            let _guard = self.structure.lock().await;
            self.create_unlocked(path, kind).await
        })
    }

    fn node_exists<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<bool, FsError>> {
        Box::pin(async move { Ok(self.get_node(path).await?.is_some()) })
    }

    fn get_node<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<Option<FsNode>, FsError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            validate_path(path)?;
            self.load_node(path).await
        })
    }

    fn rename_node<'a>(
        &'a self,
        old_path: &'a str,
        new_path: &'a str,
    ) -> FsFuture<'a, Result<RenamedNode, FsError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            validate_child_path(old_path)?;
            validate_child_path(new_path)?;
            let _guard = self.structure.lock().await;

            if self.load_node(old_path).await?.is_none() {
                return Err(FsError::not_found(old_path));
            }
            if new_path
                .strip_prefix(old_path)
                .is_some_and(|rest| rest.starts_with('/'))
            {
                return Err(FsError::invalid_path(
                    new_path,
                    "cannot move a node inside itself",
                ));
            }
            if let Some(occupant) = self.load_node(new_path).await? {
                return Err(FsError::AlreadyExists {
                    path: new_path.to_string(),
                    kind: occupant.kind,
                });
            }
            self.load_folder(parent_path(new_path)).await?;

            let from = self.delete_unlocked(old_path).await?;
            let to = self.create_unlocked(new_path, from.kind).await?;
            tracing::debug!(from = old_path, to = new_path, "renamed node");
            Ok(RenamedNode { from, to })
        })
    }

    fn delete_node<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<FsNode, FsError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            validate_path(path)?;
            let _guard = self.structure.lock().await;
            self.delete_unlocked(path).await
        })
    }

    fn open_file<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<Option<Vec<u8>>, FsError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            validate_path(path)?;
            match self.load_node(path).await? {
                Some(node) if node.is_file() => {}
                Some(_) => return Err(FsError::wrong_kind(path, NodeKind::File)),
                None => return Err(FsError::not_found(path)),
            }
            Ok(self.store.get(StoreNamespace::Content, path).await?)
        })
    }

    fn write_file<'a>(
        &'a self,
        path: &'a str,
        payload: &'a [u8],
    ) -> FsFuture<'a, Result<WriteOutcome, FsError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            validate_child_path(path)?;
            let _guard = self.structure.lock().await;

            let outcome = match self.load_node(path).await? {
                None => WriteOutcome::Created(self.create_unlocked(path, NodeKind::File).await?),
                Some(node) if node.is_file() => WriteOutcome::Overwritten,
                Some(_) => return Err(FsError::wrong_kind(path, NodeKind::File)),
            };
            self.store
                .put(StoreNamespace::Content, path, payload.to_vec())
                .await?;

            tracing::debug!(path, bytes = payload.len(), "wrote file content");
            Ok(outcome)
        })
    }

    fn list_directory<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<Vec<FsNode>, FsError>> {
        Box::pin(async move {
            self.ensure_initialized()?;
            validate_path(path)?;
            let folder = self.load_folder(path).await?;

            let mut entries = Vec::with_capacity(folder.child_paths().len());
            for child in folder.child_paths() {
                match self.load_node(child).await {
                    Ok(Some(node)) => entries.push(node),
                    Ok(None) => {
                        tracing::warn!(directory = path, child = %child, "skipping missing child");
                    }
                    Err(err) => {
                        tracing::warn!(
                            directory = path,
                            child = %child,
                            error = %err,
                            "skipping unreadable child"
                        );
                    }
                }
            }
            Ok(entries)
        })
    }
}
