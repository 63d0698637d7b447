//! Main ledger orchestration layer
//!
//! This module ties together id generation, the record store, and the
//! duplicate index into a high-level API for transaction processing.
//!
//! # Example
//!
//! ```no_run
//! use txledger_core::{Config, Ledger};
//!
//! fn main() -> txledger_core::Result<()> {
//!     let ledger = Ledger::new(Config::default())?;
//!
//!     // Create from an already validated draft
//!     // let draft: TransactionDraft = ...;
//!     // let created = ledger.create(draft)?;
//!
//!     let page = ledger.list(0, 20);
//!     assert_eq!(page.total, 0);
//!     Ok(())
//! }
//! ```
//!
//! # Duplicate detection guarantee
//!
//! The duplicate check and the following index/store writes are separate
//! steps, not one atomic unit. Two threads racing the same draft through
//! the same wall-clock second can both pass the check and both commit.
//! The guard is best-effort protection against accidental resubmission,
//! not a uniqueness constraint; the structures themselves stay coherent
//! under any interleaving.

use crate::{
    clock::{Clock, SystemClock},
    dedup::{blocks_resubmission, DuplicateIndex, Fingerprint},
    error::{Error, Result},
    id::IdGenerator,
    metrics::LedgerMetrics,
    page::{paginate, Page},
    store::TransactionStore,
    types::{Transaction, TransactionDraft, TransactionId},
    Config,
};
use std::sync::Arc;

/// Main ledger interface
pub struct Ledger {
    /// Primary record store
    store: TransactionStore,

    /// Fingerprint index for duplicate detection
    index: DuplicateIndex,

    /// Id generator (node discriminator comes from config)
    generator: IdGenerator,

    /// Time source shared with the generator
    clock: Arc<dyn Clock>,

    /// Configuration
    config: Config,

    /// Metrics collector (instance-owned registry)
    metrics: LedgerMetrics,
}

impl Ledger {
    /// Create a ledger on the system clock
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a ledger on an injected clock.
    ///
    /// The same clock drives id timestamps, record timestamps and the
    /// duplicate window, so tests can steer all three together.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let generator = IdGenerator::new(config.node_id, Arc::clone(&clock))?;
        let metrics = LedgerMetrics::new()?;

        Ok(Self {
            store: TransactionStore::new(),
            index: DuplicateIndex::new(),
            generator,
            clock,
            config,
            metrics,
        })
    }

    /// Record a new transaction.
    ///
    /// Assigns the id and the creation timestamp, defaults a missing
    /// status to `Initiated`, and runs the duplicate guard before
    /// publishing the record.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateDetected`] when an equivalent non-terminal
    /// record was created inside the configured window;
    /// [`Error::ClockRegression`] when no id can be issued safely.
    pub fn create(&self, draft: TransactionDraft) -> Result<Transaction> {
        let id = self.generator.next_id().map_err(|err| {
            tracing::error!(error = %err, "Id generation failed, create refused");
            err
        })?;
        let now = self.clock.now();
        let transaction = Transaction::from_draft(draft, id, now);

        if let Some(fingerprint) = Fingerprint::of(&transaction) {
            if let Some(existing_id) = self.index.lookup(&fingerprint) {
                // A dangling index entry (record since deleted) never blocks.
                if let Ok(existing) = self.store.get(existing_id) {
                    if blocks_resubmission(&existing, now, self.config.duplicate_window_secs) {
                        self.metrics.record_duplicate_rejected();
                        tracing::debug!(
                            existing_id = %existing.id,
                            "Create rejected as rapid duplicate"
                        );
                        return Err(Error::DuplicateDetected {
                            existing: existing.id,
                            window_secs: self.config.duplicate_window_secs,
                        });
                    }
                }
            }
            self.index.record(fingerprint, id);
        }

        self.store.insert(transaction.clone());
        self.metrics.record_created();
        self.metrics.set_store_size(self.store.len());

        tracing::debug!(id = %transaction.id, status = ?transaction.status, "Transaction created");
        Ok(transaction)
    }

    /// Replace every business field of an existing transaction.
    ///
    /// The id and the creation timestamp are preserved; a missing status
    /// in the draft defaults to `Initiated`. The old fingerprint is
    /// dropped from the index and the new value is re-indexed only while
    /// it stays non-terminal.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the id is absent.
    pub fn update(&self, id: TransactionId, draft: TransactionDraft) -> Result<Transaction> {
        let existing = self.store.get(id)?;

        if let Some(old_fingerprint) = Fingerprint::of(&existing) {
            self.index.forget(&old_fingerprint);
        }

        let updated = Transaction::from_draft(draft, id, existing.timestamp);

        if let Some(fingerprint) = Fingerprint::of(&updated) {
            if !updated.status.is_terminal() {
                self.index.record(fingerprint, id);
            }
        }

        self.store.replace(id, updated.clone())?;
        self.metrics.record_updated();

        tracing::debug!(id = %id, status = ?updated.status, "Transaction updated");
        Ok(updated)
    }

    /// Remove a transaction and free its fingerprint.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the id is absent.
    pub fn delete(&self, id: TransactionId) -> Result<()> {
        let existing = self.store.get(id)?;

        if let Some(fingerprint) = Fingerprint::of(&existing) {
            self.index.forget(&fingerprint);
        }

        self.store.remove(id)?;
        self.metrics.record_deleted();
        self.metrics.set_store_size(self.store.len());

        tracing::info!(id = %id, "Transaction deleted");
        Ok(())
    }

    /// Fetch a transaction by id.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the id is absent.
    pub fn get(&self, id: TransactionId) -> Result<Transaction> {
        self.store.get(id)
    }

    /// List transactions, oldest first, one page at a time.
    ///
    /// `page` is zero-based. Ids are time-ordered, so ascending-id order
    /// makes pagination deterministic. A page past the end is empty, not
    /// an error.
    pub fn list(&self, page: usize, page_size: usize) -> Page<Transaction> {
        let mut transactions = self.store.snapshot();
        transactions.sort_by_key(|transaction| transaction.id);
        paginate(transactions, page, page_size)
    }

    /// Get the metrics collector (for scraping by the serving layer)
    pub fn metrics(&self) -> &LedgerMetrics {
        &self.metrics
    }

    /// Get the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("stored", &self.store.len())
            .field("indexed", &self.index.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
