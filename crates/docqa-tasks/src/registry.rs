//! In-flight registry of background processing units.
//!
//! Maps a question id to the cancel handle of its spawned unit. Entries are
//! added on submit and removed on completion, cancellation, or shutdown;
//! at most one unit is registered per question id at any time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Cancel handle for one registered background unit.
pub struct UnitHandle {
    cancel_tx: oneshot::Sender<()>,
}

impl UnitHandle {
    /// Create a handle and the receiver its unit listens on.
    pub fn new() -> (Self, oneshot::Receiver<()>) {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        (Self { cancel_tx }, cancel_rx)
    }

    /// Request cooperative cancellation. A unit already past its
    /// cancellation checkpoint ignores this.
    fn cancel(self) {
        let _ = self.cancel_tx.send(());
    }
}

/// Shared registry of in-flight units, owned by the lifecycle manager.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    inner: Arc<Mutex<HashMap<i64, UnitHandle>>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit for a question id.
    ///
    /// If an entry already exists for the id, the previous unit is cancelled
    /// before being replaced, preserving the one-unit-per-question invariant.
    pub fn register(&self, question_id: i64, handle: UnitHandle) {
        let previous = {
            let mut inner = self.inner.lock().expect("task registry poisoned");
            inner.insert(question_id, handle)
        };
        if let Some(previous) = previous {
            warn!(
                subsystem = "tasks",
                component = "registry",
                question_id,
                "Replacing an already-registered unit; cancelling the old one"
            );
            previous.cancel();
        }
    }

    /// Request cancellation of the unit for a question id, removing it from
    /// the registry. Returns true if a unit was registered.
    pub fn cancel(&self, question_id: i64) -> bool {
        let handle = {
            let mut inner = self.inner.lock().expect("task registry poisoned");
            inner.remove(&question_id)
        };
        match handle {
            Some(handle) => {
                handle.cancel();
                debug!(
                    subsystem = "tasks",
                    component = "registry",
                    question_id,
                    "Cancelled in-flight unit"
                );
                true
            }
            None => false,
        }
    }

    /// Remove a unit's entry without cancelling (called by the unit itself
    /// on completion).
    pub fn deregister(&self, question_id: i64) {
        let mut inner = self.inner.lock().expect("task registry poisoned");
        inner.remove(&question_id);
    }

    /// Whether a unit is registered for a question id.
    pub fn contains(&self, question_id: i64) -> bool {
        let inner = self.inner.lock().expect("task registry poisoned");
        inner.contains_key(&question_id)
    }

    /// Number of in-flight units.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("task registry poisoned");
        inner.len()
    }

    /// Question ids with a registered unit, in no particular order.
    pub fn ids(&self) -> Vec<i64> {
        let inner = self.inner.lock().expect("task registry poisoned");
        inner.keys().copied().collect()
    }

    /// True when no units are in flight.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cancel every registered unit and clear the registry (shutdown path).
    pub fn clear(&self) {
        let drained: Vec<(i64, UnitHandle)> = {
            let mut inner = self.inner.lock().expect("task registry poisoned");
            inner.drain().collect()
        };
        for (question_id, handle) in drained {
            debug!(
                subsystem = "tasks",
                component = "registry",
                question_id,
                "Cancelling unit at shutdown"
            );
            handle.cancel();
        }
    }
}
