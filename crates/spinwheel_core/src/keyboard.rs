//! Namespaced keyboard listener registry
//!
//! Keystrokes arrive through one global hook, but every wheel instance needs
//! to react while its own anchor is focused. Each instance registers under
//! its own namespace (e.g. `keydown.spinwheel.3`) so tearing one instance
//! down removes exactly its listeners and never touches another instance's.
//!
//! The hub stores plain targets rather than closures: the owner resolves a
//! target to the instance and dispatches to it, which keeps listener
//! bookkeeping separate from instance borrowing.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to one registration
    pub struct ListenerId;
}

/// Registry of keyboard listeners grouped by namespace
pub struct KeyboardHub<T> {
    /// Registered targets
    listeners: SlotMap<ListenerId, T>,
    /// Namespace -> registrations, for O(1) teardown by namespace
    namespaces: FxHashMap<String, SmallVec<[ListenerId; 2]>>,
}

impl<T> KeyboardHub<T> {
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            namespaces: FxHashMap::default(),
        }
    }

    /// Register `target` under `namespace`
    pub fn register(&mut self, namespace: impl Into<String>, target: T) -> ListenerId {
        let namespace = namespace.into();
        let id = self.listeners.insert(target);
        self.namespaces.entry(namespace).or_default().push(id);
        id
    }

    /// Remove every registration in `namespace`, returning how many were removed
    pub fn unregister_namespace(&mut self, namespace: &str) -> usize {
        let Some(ids) = self.namespaces.remove(namespace) else {
            return 0;
        };
        let removed = ids
            .iter()
            .filter(|id| self.listeners.remove(**id).is_some())
            .count();
        tracing::debug!(namespace, removed, "keyboard listeners unregistered");
        removed
    }

    /// Whether any listener is registered under `namespace`
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Snapshot of every registered target, for dispatching one keystroke
    pub fn targets(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.listeners.values().cloned().collect()
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for KeyboardHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for KeyboardHub<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardHub")
            .field("listeners", &self.listeners.len())
            .field("namespaces", &self.namespaces.len())
            .finish()
    }
}
