//! # Fund Transfer Seam
//!
//! The ledger moves money through the [`FundTransfer`] primitive: a
//! side-effecting call it emits but never reads back. A production
//! implementation would perform a real balance-affecting transaction (and
//! handle its failure — an extension point outside this core).
//!
//! [`TransferLog`] is the reference implementation: an ordered in-memory
//! log of [`TransferRecord`]s for audit and assertion. The log preserves
//! emission order, so the fee cut of a deposit always precedes the net
//! amount entry.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use wayfarer_core::PrincipalId;

/// A unique identifier for a recorded fund transfer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferId(Uuid);

impl TransferId {
    /// Create a new random transfer identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a transfer identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transfer:{}", self.0)
    }
}

/// A single recorded fund movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Unique record identifier.
    pub id: TransferId,
    /// Amount moved.
    pub amount: u64,
    /// Source account.
    pub from: PrincipalId,
    /// Destination account.
    pub to: PrincipalId,
    /// Wall-clock time the transfer was recorded.
    pub executed_at: DateTime<Utc>,
}

/// Fund-transfer primitive consumed by the escrow ledger.
///
/// The ledger only emits transfers; it never inspects a result. Ordering
/// of calls is significant and implementations must preserve it.
pub trait FundTransfer {
    /// Move `amount` from `from` to `to`.
    fn transfer(&self, amount: u64, from: &PrincipalId, to: &PrincipalId);
}

/// Ordered in-memory transfer log.
///
/// Thread-safe; entries appear in emission order.
#[derive(Debug, Default)]
pub struct TransferLog {
    entries: Mutex<Vec<TransferRecord>>,
}

impl TransferLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded transfers, oldest first.
    pub fn entries(&self) -> Vec<TransferRecord> {
        self.entries.lock().clone()
    }

    /// Number of recorded transfers.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no transfers have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl FundTransfer for TransferLog {
    fn transfer(&self, amount: u64, from: &PrincipalId, to: &PrincipalId) {
        self.entries.lock().push(TransferRecord {
            id: TransferId::new(),
            amount,
            from: from.clone(),
            to: to.clone(),
            executed_at: Utc::now(),
        });
    }
}

// Allow a harness to keep a handle on the log while the ledger owns the
// sink.
impl<T: FundTransfer + ?Sized> FundTransfer for Arc<T> {
    fn transfer(&self, amount: u64, from: &PrincipalId, to: &PrincipalId) {
        (**self).transfer(amount, from, to);
    }
}
