//! Duplicate detection
//!
//! Rapid-resubmission protection built from two pieces:
//!
//! - [`Fingerprint`]: a derived identity string over the business fields
//!   `amount`, `type`, `source account`, `currency` and the creation
//!   instant truncated to whole seconds. Two submissions fingerprint
//!   equal iff those fields match and they landed in the same wall-clock
//!   second.
//! - [`DuplicateIndex`]: a concurrent map from fingerprint to the id of
//!   the most recent record carrying it.
//!
//! Records in a failure-class status (failed, cancelled, reversed,
//! rejected) carry no fingerprint at all and are invisible to the index.
//! Completed records do fingerprint and do get indexed, but never block a
//! new submission: the blocking rule exempts every terminal status. An
//! index hit only rejects when the existing record is still inside the
//! configured window and not terminal.

use crate::types::{Transaction, TransactionId, TransactionStatus};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::fmt;

/// Derived duplicate-detection identity of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a record.
    ///
    /// Returns `None` for failure-class statuses; those records never
    /// participate in duplicate detection. The amount component is the
    /// decimal rendering, so `5` and `5.00` are distinct identities.
    pub fn of(transaction: &Transaction) -> Option<Fingerprint> {
        match transaction.status {
            TransactionStatus::Failed
            | TransactionStatus::Cancelled
            | TransactionStatus::Reversed
            | TransactionStatus::Rejected => None,
            _ => Some(Fingerprint(format!(
                "{}_{}_{}_{}_{}",
                transaction.amount,
                transaction.tx_type,
                transaction.source_account_number,
                transaction.currency,
                transaction.timestamp.timestamp()
            ))),
        }
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an existing record blocks a new submission with the same
/// fingerprint: it must still be inside the window and not terminal.
pub(crate) fn blocks_resubmission(
    existing: &Transaction,
    now: DateTime<Utc>,
    window_secs: u64,
) -> bool {
    let elapsed_secs = (now - existing.timestamp).num_seconds();
    elapsed_secs <= window_secs as i64 && !existing.status.is_terminal()
}

/// Concurrent fingerprint index
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    entries: DashMap<Fingerprint, TransactionId>,
}

impl DuplicateIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Look up the id currently indexed under this fingerprint
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<TransactionId> {
        self.entries.get(fingerprint).map(|entry| *entry.value())
    }

    /// Index an id under its fingerprint.
    ///
    /// Replaces any previous holder: the index tracks the most recent
    /// record per fingerprint, not all of them.
    pub fn record(&self, fingerprint: Fingerprint, id: TransactionId) {
        self.entries.insert(fingerprint, id);
    }

    /// Drop the entry for this fingerprint, if present
    pub fn forget(&self, fingerprint: &Fingerprint) {
        self.entries.remove(fingerprint);
    }

    /// Number of indexed fingerprints
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AccountId, CurrencyCode, RiskLevel, Transaction, TransactionCategory, TransactionDraft,
        TransactionType,
    };
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;

    fn tx(
        id: u64,
        amount: Decimal,
        status: TransactionStatus,
        timestamp: DateTime<Utc>,
    ) -> Transaction {
        let draft = TransactionDraft {
            amount,
            tx_type: TransactionType::Transfer,
            source_account_number: AccountId::new("1234567890"),
            destination_account_number: Some(AccountId::new("0987654321")),
            currency: CurrencyCode::new("USD"),
            exchange_rate: None,
            category: TransactionCategory::Transfer,
            description: None,
            status: Some(status),
            risk_level: RiskLevel::Low,
            reference_number: None,
            processed_time: None,
            processed_by: None,
            remarks: None,
            is_reconciled: false,
            is_fraud_suspected: false,
            ip_address: None,
            device_info: None,
        };
        Transaction::from_draft(draft, TransactionId::new(id), timestamp)
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_fingerprint_format() {
        let t = tx(
            1,
            Decimal::new(50000, 2),
            TransactionStatus::Initiated,
            base_time(),
        );
        let fingerprint = Fingerprint::of(&t).unwrap();
        let expected = format!("500.00_TRANSFER_1234567890_USD_{}", base_time().timestamp());
        assert_eq!(fingerprint.as_str(), expected);
    }

    #[test]
    fn test_same_second_shares_fingerprint() {
        let amount = Decimal::new(50000, 2);
        let a = tx(1, amount, TransactionStatus::Initiated, base_time());
        let b = tx(
            2,
            amount,
            TransactionStatus::Initiated,
            base_time() + Duration::milliseconds(300),
        );
        let c = tx(
            3,
            amount,
            TransactionStatus::Initiated,
            base_time() + Duration::seconds(1),
        );

        assert_eq!(Fingerprint::of(&a), Fingerprint::of(&b));
        assert_ne!(Fingerprint::of(&a), Fingerprint::of(&c));
    }

    #[test]
    fn test_failure_class_statuses_have_no_fingerprint() {
        let amount = Decimal::new(50000, 2);
        for status in [
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
            TransactionStatus::Reversed,
            TransactionStatus::Rejected,
        ] {
            assert!(Fingerprint::of(&tx(1, amount, status, base_time())).is_none());
        }
    }

    #[test]
    fn test_completed_still_fingerprints() {
        let amount = Decimal::new(50000, 2);
        for status in [
            TransactionStatus::Initiated,
            TransactionStatus::Pending,
            TransactionStatus::Processing,
            TransactionStatus::Completed,
            TransactionStatus::Suspicious,
        ] {
            assert!(Fingerprint::of(&tx(1, amount, status, base_time())).is_some());
        }
    }

    #[test]
    fn test_amount_scale_is_identity_relevant() {
        let plain = tx(1, Decimal::new(5, 0), TransactionStatus::Initiated, base_time());
        let scaled = tx(2, Decimal::new(500, 2), TransactionStatus::Initiated, base_time());
        assert_ne!(Fingerprint::of(&plain), Fingerprint::of(&scaled));
    }

    #[test]
    fn test_index_roundtrip() {
        let index = DuplicateIndex::new();
        let t = tx(
            7,
            Decimal::new(50000, 2),
            TransactionStatus::Initiated,
            base_time(),
        );
        let fingerprint = Fingerprint::of(&t).unwrap();

        assert!(index.lookup(&fingerprint).is_none());
        index.record(fingerprint.clone(), t.id);
        assert_eq!(index.lookup(&fingerprint), Some(TransactionId::new(7)));

        index.forget(&fingerprint);
        assert!(index.lookup(&fingerprint).is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_index_keeps_most_recent_holder() {
        let index = DuplicateIndex::new();
        let t = tx(
            1,
            Decimal::new(50000, 2),
            TransactionStatus::Initiated,
            base_time(),
        );
        let fingerprint = Fingerprint::of(&t).unwrap();

        index.record(fingerprint.clone(), TransactionId::new(1));
        index.record(fingerprint.clone(), TransactionId::new(2));

        assert_eq!(index.lookup(&fingerprint), Some(TransactionId::new(2)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_blocking_rule_inside_window() {
        let existing = tx(
            1,
            Decimal::new(50000, 2),
            TransactionStatus::Initiated,
            base_time(),
        );
        assert!(blocks_resubmission(&existing, base_time(), 5));
        assert!(blocks_resubmission(
            &existing,
            base_time() + Duration::seconds(5),
            5
        ));
    }

    #[test]
    fn test_blocking_rule_outside_window() {
        let existing = tx(
            1,
            Decimal::new(50000, 2),
            TransactionStatus::Initiated,
            base_time(),
        );
        assert!(!blocks_resubmission(
            &existing,
            base_time() + Duration::seconds(6),
            5
        ));
    }

    #[test]
    fn test_blocking_rule_exempts_terminal() {
        let completed = tx(
            1,
            Decimal::new(50000, 2),
            TransactionStatus::Completed,
            base_time(),
        );
        assert!(!blocks_resubmission(&completed, base_time(), 5));
    }

    #[test]
    fn test_blocking_rule_tolerates_future_records() {
        // A record stamped ahead of "now" reads as negative elapsed time
        // and still counts as inside the window.
        let existing = tx(
            1,
            Decimal::new(50000, 2),
            TransactionStatus::Initiated,
            base_time() + Duration::seconds(30),
        );
        assert!(blocks_resubmission(&existing, base_time(), 5));
    }
}
