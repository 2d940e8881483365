//! Registry of authentication observers.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::provider::AuthenticationObserver;

/// Registry of [`AuthenticationObserver`]s.
///
/// Observers are registered under a unique id during system wiring and are
/// notified synchronously, in registration order. An empty registry is a
/// valid configuration.
#[derive(Debug, Default)]
pub struct ObserverRegistry {
    observers: RwLock<Vec<ObserverEntry>>,
}

#[derive(Debug, Clone)]
struct ObserverEntry {
    id: &'static str,
    observer: Arc<dyn AuthenticationObserver>,
}

impl ObserverRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer, replacing any observer with the same id.
    pub fn register(&self, id: &'static str, observer: Arc<dyn AuthenticationObserver>) {
        let mut observers = self.observers.write();
        if let Some(entry) = observers.iter_mut().find(|e| e.id == id) {
            entry.observer = observer;
        } else {
            observers.push(ObserverEntry { id, observer });
        }
    }

    /// Removes the observer registered under `id`.
    ///
    /// Returns true if an observer was removed.
    pub fn unregister(&self, id: &str) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|e| e.id != id);
        observers.len() != before
    }

    /// Lists the ids of all registered observers.
    #[must_use]
    pub fn list_observers(&self) -> Vec<&'static str> {
        self.observers.read().iter().map(|e| e.id).collect()
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Returns true if no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Notifies every observer that authentication started for `tenant_id`.
    ///
    /// Observers run on a snapshot of the registry, so an observer may
    /// register or unregister others without deadlocking.
    pub fn notify_started(&self, tenant_id: i32) {
        let snapshot: Vec<ObserverEntry> = self.observers.read().clone();
        for entry in snapshot {
            tracing::trace!(observer = entry.id, tenant_id, "Notifying authentication observer");
            entry.observer.started_authentication(tenant_id);
        }
    }
}
