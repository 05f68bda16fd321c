//! Per-directory change subscriptions.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::types::{FsEvent, FsNode};

/// Callback invoked with the event kind and the affected node.
pub type ObserverCallback = Rc<dyn Fn(FsEvent, &FsNode)>;

/// Registry of directory subscribers keyed by directory path.
///
/// Callbacks are compared by pointer identity; the registry does not own their behavior. Delivery
/// is synchronous and does not isolate callbacks from each other: a panic inside a callback
/// unwinds through [`ChangeNotifier::notify`] to the caller.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: RefCell<HashMap<String, Vec<ObserverCallback>>>,
}

impl ChangeNotifier {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `callback` to the subscriber list of `directory`. Duplicates are retained.
    pub fn add_observer(&self, directory: &str, callback: ObserverCallback) {
        self.observers
            .borrow_mut()
            .entry(directory.to_string())
            .or_default()
            .push(callback);
    }

    /// Removes every occurrence of `callback` from the list of `directory`.
    pub fn remove_observer(&self, directory: &str, callback: &ObserverCallback) {
        let mut observers = self.observers.borrow_mut();
        let Some(list) = observers.get_mut(directory) else {
            return;
        };
        list.retain(|registered| !same_callback(registered, callback));
        if list.is_empty() {
            observers.remove(directory);
        }
    }

    /// Delivers `event` for `node` to the subscribers of `directory`, in registration order.
    ///
    /// The subscriber list is snapshotted before delivery, so callbacks may register, remove, or
    /// trigger further notifications without conflicting with this call.
    pub fn notify(&self, directory: &str, event: FsEvent, node: &FsNode) {
        let snapshot = self
            .observers
            .borrow()
            .get(directory)
            .cloned()
            .unwrap_or_default();
        tracing::debug!(
            directory,
            ?event,
            path = %node.path,
            subscribers = snapshot.len(),
            "notifying directory observers"
        );
        for callback in snapshot {
            callback(event, node);
        }
    }

    /// Number of callbacks registered for `directory`.
    pub fn observer_count(&self, directory: &str) -> usize {
        self.observers
            .borrow()
            .get(directory)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn same_callback(a: &ObserverCallback, b: &ObserverCallback) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
