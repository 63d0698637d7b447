//! Metrics collection for observability
//!
//! Prometheus metrics for monitoring ledger activity.
//!
//! # Metrics
//!
//! - `ledger_transactions_created_total` - Total transactions created
//! - `ledger_transactions_updated_total` - Total transactions updated
//! - `ledger_transactions_deleted_total` - Total transactions deleted
//! - `ledger_duplicates_rejected_total` - Total creates rejected as duplicates
//! - `ledger_store_size` - Transactions currently stored
//!
//! Every metric lives in a registry owned by the collector instance, never
//! the process-global default registry, so independent ledger instances in
//! one process cannot collide on metric names.

use prometheus::{IntCounter, IntGauge, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct LedgerMetrics {
    /// Total transactions created
    pub created_total: IntCounter,

    /// Total transactions updated
    pub updated_total: IntCounter,

    /// Total transactions deleted
    pub deleted_total: IntCounter,

    /// Total creates rejected as duplicates
    pub duplicates_rejected_total: IntCounter,

    /// Transactions currently stored
    pub store_size: IntGauge,

    /// Prometheus registry holding the metrics above
    pub registry: Arc<Registry>,
}

impl LedgerMetrics {
    /// Create a collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let created_total = IntCounter::new(
            "ledger_transactions_created_total",
            "Total transactions created",
        )?;
        registry.register(Box::new(created_total.clone()))?;

        let updated_total = IntCounter::new(
            "ledger_transactions_updated_total",
            "Total transactions updated",
        )?;
        registry.register(Box::new(updated_total.clone()))?;

        let deleted_total = IntCounter::new(
            "ledger_transactions_deleted_total",
            "Total transactions deleted",
        )?;
        registry.register(Box::new(deleted_total.clone()))?;

        let duplicates_rejected_total = IntCounter::new(
            "ledger_duplicates_rejected_total",
            "Total creates rejected as duplicates",
        )?;
        registry.register(Box::new(duplicates_rejected_total.clone()))?;

        let store_size = IntGauge::new("ledger_store_size", "Transactions currently stored")?;
        registry.register(Box::new(store_size.clone()))?;

        Ok(Self {
            created_total,
            updated_total,
            deleted_total,
            duplicates_rejected_total,
            store_size,
            registry,
        })
    }

    /// Record a successful create
    pub fn record_created(&self) {
        self.created_total.inc();
    }

    /// Record a successful update
    pub fn record_updated(&self) {
        self.updated_total.inc();
    }

    /// Record a successful delete
    pub fn record_deleted(&self) {
        self.deleted_total.inc();
    }

    /// Record a create rejected as a duplicate
    pub fn record_duplicate_rejected(&self) {
        self.duplicates_rejected_total.inc();
    }

    /// Update the stored-transaction gauge
    pub fn set_store_size(&self, size: usize) {
        self.store_size.set(size as i64);
    }

    /// Get metrics registry (for scraping by the serving layer)
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl std::fmt::Debug for LedgerMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerMetrics")
            .field("created", &self.created_total.get())
            .field("updated", &self.updated_total.get())
            .field("deleted", &self.deleted_total.get())
            .field("duplicates_rejected", &self.duplicates_rejected_total.get())
            .field("store_size", &self.store_size.get())
            .finish_non_exhaustive()
    }
}
