//! Notifying file-system facade.

use super::error::FsError;
use super::observer::{ChangeNotifier, ObserverCallback};
use super::path::parent_path;
use super::service::{FileSystemService, FsFuture, VirtualFileSystem};
use super::types::{FsEvent, FsNode, NodeKind, RenamedNode, WriteOutcome};

/// File system that announces structural changes to per-directory observers.
///
/// Wraps an inner [`FileSystemService`] and owns the [`ChangeNotifier`]; callers reach the
/// registry only through [`add_observer`](Self::add_observer) and
/// [`remove_observer`](Self::remove_observer). Events go to the parent directory of the
/// affected node after the inner operation succeeds.
pub struct ObservableFileSystem<F = VirtualFileSystem> {
    inner: F,
    notifier: ChangeNotifier,
}

impl<F: FileSystemService> ObservableFileSystem<F> {
    /// Wraps `inner` with an empty observer registry.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Borrows the wrapped file system. Mutations made through it are not announced.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Subscribes `callback` to creations and deletions directly inside `directory`.
    pub fn add_observer(&self, directory: &str, callback: ObserverCallback) {
        self.notifier.add_observer(directory, callback);
    }

    /// Removes every registration of `callback` for `directory`.
    pub fn remove_observer(&self, directory: &str, callback: &ObserverCallback) {
        self.notifier.remove_observer(directory, callback);
    }

    /// Number of callbacks registered for `directory`.
    pub fn observer_count(&self, directory: &str) -> usize {
        self.notifier.observer_count(directory)
    }

    fn announce(&self, event: FsEvent, node: &FsNode) {
        self.notifier.notify(parent_path(&node.path), event, node);
    }
}

impl<F: FileSystemService> FileSystemService for ObservableFileSystem<F> {
    fn init<'a>(&'a self) -> FsFuture<'a, Result<(), FsError>> {
        self.inner.init()
    }

    fn create_node<'a>(
        &'a self,
        path: &'a str,
        kind: NodeKind,
    ) -> FsFuture<'a, Result<FsNode, FsError>> {
        Box::pin(async move {
            let node = self.inner.create_node(path, kind).await?;
            self.announce(FsEvent::Created, &node);
            Ok(node)
        })
    }

    fn node_exists<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<bool, FsError>> {
        self.inner.node_exists(path)
    }

    fn get_node<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<Option<FsNode>, FsError>> {
        self.inner.get_node(path)
    }

    fn rename_node<'a>(
        &'a self,
        old_path: &'a str,
        new_path: &'a str,
    ) -> FsFuture<'a, Result<RenamedNode, FsError>> {
        Box::pin(async move {
            let renamed = self.inner.rename_node(old_path, new_path).await?;
            self.announce(FsEvent::Deleted, &renamed.from);
            self.announce(FsEvent::Created, &renamed.to);
            Ok(renamed)
        })
    }

    fn delete_node<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<FsNode, FsError>> {
        Box::pin(async move {
            let removed = self.inner.delete_node(path).await?;
            self.announce(FsEvent::Deleted, &removed);
            Ok(removed)
        })
    }

    fn open_file<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<Option<Vec<u8>>, FsError>> {
        self.inner.open_file(path)
    }

    fn write_file<'a>(
        &'a self,
        path: &'a str,
        payload: &'a [u8],
    ) -> FsFuture<'a, Result<WriteOutcome, FsError>> {
        Box::pin(async move {
            let outcome = self.inner.write_file(path, payload).await?;
            if let WriteOutcome::Created(node) = &outcome {
                self.announce(FsEvent::Created, node);
            }
            Ok(outcome)
        })
    }

    fn list_directory<'a>(&'a self, path: &'a str) -> FsFuture<'a, Result<Vec<FsNode>, FsError>> {
        self.inner.list_directory(path)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::kv::MemoryKeyValueStore;

    type Seen = Rc<RefCell<Vec<(FsEvent, String)>>>;

    fn ready_fs() -> ObservableFileSystem {
        let fs = ObservableFileSystem::new(VirtualFileSystem::new(Rc::new(
            MemoryKeyValueStore::default(),
        )));
        block_on(fs.init()).expect("init");
        fs
    }

    fn recorder() -> (Seen, ObserverCallback) {
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let callback: ObserverCallback = Rc::new(move |event: FsEvent, node: &FsNode| {
            sink.borrow_mut().push((event, node.path.clone()));
        });
        (seen, callback)
    }

    #[test]
    fn create_node_delivers_one_created_event_to_the_parent() {
        let fs = ready_fs();
        block_on(fs.create_node("/dir", NodeKind::Folder)).expect("dir");
        let (seen, callback) = recorder();
        fs.add_observer("/dir", callback);

        block_on(fs.create_node("/dir/x", NodeKind::File)).expect("create");
        assert_eq!(
            *seen.borrow(),
            vec![(FsEvent::Created, "/dir/x".to_string())]
        );
    }

    #[test]
    fn removed_observer_receives_nothing_further() {
        let fs = ready_fs();
        block_on(fs.create_node("/dir", NodeKind::Folder)).expect("dir");
        let (seen, callback) = recorder();
        fs.add_observer("/dir", callback.clone());
        block_on(fs.create_node("/dir/x", NodeKind::File)).expect("x");

        fs.remove_observer("/dir", &callback);
        assert_eq!(fs.observer_count("/dir"), 0);
        block_on(fs.create_node("/dir/y", NodeKind::File)).expect("y");
        block_on(fs.delete_node("/dir/x")).expect("delete");
        block_on(fs.write_file("/dir/z.txt", b"z")).expect("write");

        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn delete_node_announces_the_node_captured_before_removal() {
        let fs = ready_fs();
        block_on(fs.create_node("/dir", NodeKind::Folder)).expect("dir");
        block_on(fs.create_node("/dir/sub", NodeKind::Folder)).expect("sub");
        block_on(fs.create_node("/dir/sub/leaf", NodeKind::File)).expect("leaf");
        let (root_seen, root_cb) = recorder();
        let (sub_seen, sub_cb) = recorder();
        fs.add_observer("/", root_cb);
        fs.add_observer("/dir/sub", sub_cb);

        let removed = block_on(fs.delete_node("/dir")).expect("delete");
        assert_eq!(removed.path, "/dir");
        assert_eq!(
            *root_seen.borrow(),
            vec![(FsEvent::Deleted, "/dir".to_string())]
        );
        assert!(sub_seen.borrow().is_empty());
    }

    #[test]
    fn write_file_announces_only_when_it_creates() {
        let fs = ready_fs();
        let (seen, callback) = recorder();
        fs.add_observer("/", callback);

        block_on(fs.write_file("/a.txt", b"1")).expect("create");
        block_on(fs.write_file("/a.txt", b"2")).expect("overwrite");
        assert_eq!(
            *seen.borrow(),
            vec![(FsEvent::Created, "/a.txt".to_string())]
        );
    }

    #[test]
    fn rename_announces_deleted_then_created() {
        let fs = ready_fs();
        block_on(fs.create_node("/dst", NodeKind::Folder)).expect("dst");
        block_on(fs.create_node("/a.txt", NodeKind::File)).expect("file");
        let (root_seen, root_cb) = recorder();
        let (dst_seen, dst_cb) = recorder();
        fs.add_observer("/", root_cb);
        fs.add_observer("/dst", dst_cb);

        block_on(fs.rename_node("/a.txt", "/dst/b.txt")).expect("rename");
        assert_eq!(
            *root_seen.borrow(),
            vec![(FsEvent::Deleted, "/a.txt".to_string())]
        );
        assert_eq!(
            *dst_seen.borrow(),
            vec![(FsEvent::Created, "/dst/b.txt".to_string())]
        );
    }

    #[test]
    fn failed_operations_announce_nothing() {
        let fs = ready_fs();
        let (seen, callback) = recorder();
        fs.add_observer("/", callback);

        block_on(fs.create_node("/a", NodeKind::Folder)).expect("a");
        assert!(block_on(fs.create_node("/a", NodeKind::Folder)).is_err());
        assert!(block_on(fs.delete_node("/ghost")).is_err());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn observer_may_subscribe_to_a_folder_it_was_told_about() {
        let fs = Rc::new(ready_fs());
        let (child_seen, child_cb) = recorder();
        let callback: ObserverCallback = {
            let fs = Rc::downgrade(&fs);
            Rc::new(move |event: FsEvent, node: &FsNode| {
                if let (FsEvent::Created, Some(fs)) = (event, fs.upgrade()) {
                    if node.is_folder() {
                        fs.add_observer(&node.path, child_cb.clone());
                    }
                }
            })
        };
        fs.add_observer("/", callback);

        block_on(fs.create_node("/new", NodeKind::Folder)).expect("create");
        assert_eq!(fs.observer_count("/new"), 1);
        block_on(fs.create_node("/new/inner.txt", NodeKind::File)).expect("inner");
        assert_eq!(
            *child_seen.borrow(),
            vec![(FsEvent::Created, "/new/inner.txt".to_string())]
        );
    }
}
