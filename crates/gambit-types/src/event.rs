//! Registry change-event record.
//!
//! One event is produced for every registry mutation. Delivery is
//! best-effort: the registry drops an event rather than wait for room in
//! its queue, so consumers must not count on seeing every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Collection, Operation};

/// An immutable description of one registry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The collection that changed.
    pub collection: Collection,
    /// What happened to it.
    pub operation: Operation,
    /// Wall-clock time of the mutation.
    pub timestamp: DateTime<Utc>,
    /// Free-text detail, e.g. which game was removed.
    pub detail: String,
}

impl ChangeEvent {
    /// Create an event stamped with the current time.
    pub fn now(collection: Collection, operation: Operation, detail: impl Into<String>) -> Self {
        Self {
            collection,
            operation,
            timestamp: Utc::now(),
            detail: detail.into(),
        }
    }
}
