//! Primary in-memory transaction store
//!
//! A sharded concurrent map keyed by [`TransactionId`]. Values are owned
//! records: readers receive clones, so no reference ever escapes a shard
//! lock and mutations never block the whole store.
//!
//! Single-key operations are atomic. Compound sequences (read-modify-write
//! across calls) are not; the ledger layer owns those semantics.

use crate::error::{Error, Result};
use crate::types::{Transaction, TransactionId};
use dashmap::DashMap;

/// Concurrent store of transaction records
#[derive(Debug, Default)]
pub struct TransactionStore {
    transactions: DashMap<TransactionId, Transaction>,
}

impl TransactionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
        }
    }

    /// Insert a freshly created record under its own id.
    ///
    /// The id generator guarantees the id is not already present.
    pub fn insert(&self, transaction: Transaction) {
        self.transactions.insert(transaction.id, transaction);
    }

    /// Fetch a copy of the record with this id
    pub fn get(&self, id: TransactionId) -> Result<Transaction> {
        self.transactions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(Error::NotFound(id))
    }

    /// Replace the record under this id with a new full value.
    ///
    /// No partial merge; the slot swap is atomic and a concurrently
    /// removed id is reported as [`Error::NotFound`] rather than
    /// resurrected.
    pub fn replace(&self, id: TransactionId, transaction: Transaction) -> Result<()> {
        match self.transactions.get_mut(&id) {
            Some(mut entry) => {
                *entry = transaction;
                Ok(())
            }
            None => Err(Error::NotFound(id)),
        }
    }

    /// Remove and return the record with this id
    pub fn remove(&self, id: TransactionId) -> Result<Transaction> {
        self.transactions
            .remove(&id)
            .map(|(_, transaction)| transaction)
            .ok_or(Error::NotFound(id))
    }

    /// Copy out every record.
    ///
    /// Weakly consistent under concurrent writes: the result is a valid
    /// set of records, though not necessarily a point-in-time snapshot.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
