//! Append-only transaction ledger.
//!
//! The ledger is the only mutable state in the book. Readers take a
//! [`LedgerSnapshot`], an immutable, version-stamped view that later appends
//! never disturb. [`SharedLedger`] serializes writers for use behind a service.

use crate::domain::{NewTransaction, Transaction, ValidationError};
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};

/// Ordered log of validated transactions.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Arc<Vec<Transaction>>,
    version: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, normalize and append a transaction.
    ///
    /// Entries are never reordered or deduplicated. Existing snapshots keep
    /// seeing the log as it was when they were taken.
    pub fn append(&mut self, record: NewTransaction) -> Result<Transaction, ValidationError> {
        let tx = record.validate()?;
        Arc::make_mut(&mut self.entries).push(tx.clone());
        self.version += 1;

        tracing::info!(
            id = %tx.id,
            key = %tx.key(),
            quantity = tx.quantity,
            price = %tx.price,
            "ledger append"
        );
        Ok(tx)
    }

    /// Remove every transaction and return how many were dropped.
    ///
    /// Clearing an empty ledger is a no-op.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        if removed == 0 {
            return 0;
        }
        self.entries = Arc::new(Vec::new());
        self.version += 1;
        tracing::info!(removed, "ledger cleared");
        removed
    }

    /// Immutable view of all transactions in insertion order.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            entries: Arc::clone(&self.entries),
            version: self.version,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Monotonic counter bumped by every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Point-in-time view of the ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    entries: Arc<Vec<Transaction>>,
    version: u64,
}

impl LedgerSnapshot {
    /// Ledger version this snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Deref for LedgerSnapshot {
    type Target = [Transaction];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

/// Thread-safe handle to a single ledger: one writer at a time, snapshot reads.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: NewTransaction) -> Result<Transaction, ValidationError> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .append(record)
    }

    pub fn clear(&self) -> usize {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }
}
