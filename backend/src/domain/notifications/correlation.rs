//! Pending SMS sends waiting for their delivery callback.
//!
//! Each entry maps a locally generated correlation id to the one-shot sender
//! that wakes the waiting request. Entries leave the table when the callback
//! resolves them or when the waiting request goes away; there is no expiry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Identifier linking an outbound SMS with its delivery report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal state of one send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed { status_code: i32 },
}

/// In-process table of sends awaiting a callback.
#[derive(Debug, Default)]
pub struct PendingDeliveries {
    waiting: Mutex<HashMap<CorrelationId, oneshot::Sender<DeliveryOutcome>>>,
}

impl PendingDeliveries {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<CorrelationId, oneshot::Sender<DeliveryOutcome>>> {
        self.waiting.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start waiting on `id`. Registering the same id twice replaces the
    /// earlier waiter, whose receiver then reports closure.
    pub fn register(&self, id: CorrelationId) -> oneshot::Receiver<DeliveryOutcome> {
        let (tx, rx) = oneshot::channel();
        self.table().insert(id, tx);
        rx
    }

    /// Complete the send waiting on `id`. Returns `false` when nothing was
    /// waiting, which includes a repeated callback for the same id.
    pub fn resolve(&self, id: &CorrelationId, outcome: DeliveryOutcome) -> bool {
        let Some(tx) = self.table().remove(id) else {
            return false;
        };
        // A receiver dropped between removal and send has nobody left to tell.
        let _ = tx.send(outcome);
        true
    }

    /// Drop the entry for `id` without resolving it.
    pub fn cancel(&self, id: &CorrelationId) -> bool {
        self.table().remove(id).is_some()
    }

    pub fn is_pending(&self, id: &CorrelationId) -> bool {
        self.table().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
