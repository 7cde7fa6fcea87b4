//! Progress observer registry.
//!
//! Synchronous pub/sub for [`ProgressEvent`]s. Callbacks are invoked inline
//! on every phase transition while emission is enabled; with emission
//! disabled, zero callback invocations occur. A panicking observer is
//! caught, logged, and ignored -- it never affects category state or the
//! run's outcome.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use tracing::warn;
use uuid::Uuid;

use crate::domain::models::ProgressEvent;

/// Signature for progress callbacks.
pub type ProgressCallback = dyn Fn(&ProgressEvent) + Send + Sync;

/// Handle identifying a registered observer, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Shared registry of progress observers.
///
/// Cloning is cheap; clones share the same observer set.
#[derive(Clone)]
pub struct ObserverRegistry {
    enabled: bool,
    observers: Arc<RwLock<HashMap<ObserverId, Arc<ProgressCallback>>>>,
}

impl ObserverRegistry {
    /// Create a registry; `enabled` mirrors `emit_progress_events`.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            observers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a callback, returning the handle for later removal.
    pub fn add(&self, callback: impl Fn(&ProgressEvent) + Send + Sync + 'static) -> ObserverId {
        let id = ObserverId::new();
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        observers.insert(id, Arc::new(callback));
        id
    }

    /// Unregister a callback. Returns whether it was registered.
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        observers.remove(&id).is_some()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        let observers = self.observers.read().unwrap_or_else(|e| e.into_inner());
        observers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver an event to every observer.
    ///
    /// When emission is disabled this makes no callback invocations at all.
    /// Callbacks run outside the registry lock, so a slow or panicking
    /// observer cannot block registration.
    pub fn emit(&self, event: &ProgressEvent) {
        if !self.enabled {
            return;
        }
        let callbacks: Vec<Arc<ProgressCallback>> = {
            let observers = self.observers.read().unwrap_or_else(|e| e.into_inner());
            observers.values().cloned().collect()
        };
        for callback in callbacks {
            let outcome = catch_unwind(AssertUnwindSafe(|| callback(event)));
            if outcome.is_err() {
                warn!(
                    event_type = %event.event_type,
                    "progress observer panicked; ignoring"
                );
            }
        }
    }
}
