//! Core types for the transaction ledger
//!
//! All types are designed for:
//! - Serde round-tripping with the external API layer (camelCase wire names)
//! - Exact arithmetic (Decimal for money)
//! - Cheap cloning into and out of the concurrent store

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Ledger-assigned transaction identifier.
///
/// A Snowflake-style 64-bit integer: unique for the process lifetime,
/// roughly time-ordered (newer ids compare greater). Only the ledger's id
/// generator produces these; callers never supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(u64);

impl TransactionId {
    /// Wrap a raw id value (used by the generator and by tests)
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw 64-bit value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account identifier (alphanumeric account number)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO 4217 currency code (3 letters, validated upstream)
///
/// Kept as an open set rather than a closed enum: the ledger treats the
/// code as an opaque business field and the API layer owns the format rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create new currency code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Funds in
    Deposit,
    /// Funds out
    Withdrawal,
    /// Account-to-account movement (requires a destination account)
    Transfer,
}

impl TransactionType {
    /// Wire name, as the API layer renders it
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Business category of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    /// Salary payment
    Salary,
    /// Investment movement
    Investment,
    /// Retail purchase
    Shopping,
    /// Utility bill
    Utilities,
    /// Entertainment spend
    Entertainment,
    /// Generic transfer
    Transfer,
    /// Loan repayment
    LoanPayment,
    /// Insurance premium
    Insurance,
    /// Tax payment
    Tax,
    /// Anything else
    Other,
}

/// Lifecycle status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Initial state assigned at creation
    Initiated,
    /// Waiting on an external step
    Pending,
    /// Being processed
    Processing,
    /// Settled successfully (terminal)
    Completed,
    /// Processing failed (terminal)
    Failed,
    /// Cancelled before completion (terminal)
    Cancelled,
    /// Completed then reversed (terminal)
    Reversed,
    /// Rejected by a control (terminal)
    Rejected,
    /// Flagged for review
    Suspicious,
}

impl TransactionStatus {
    /// Whether this status is terminal: the transaction is settled and
    /// exempt from duplicate protection.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed
                | TransactionStatus::Failed
                | TransactionStatus::Cancelled
                | TransactionStatus::Reversed
                | TransactionStatus::Rejected
        )
    }
}

/// Assessed risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk (remarks mandatory, enforced upstream)
    High,
    /// Critical risk
    Critical,
}

/// A stored transaction record.
///
/// The identity (`id`) and creation `timestamp` are assigned by the ledger
/// exactly once, at creation; every other field is replaceable via
/// `update`. Field-level rules (positive amount, 3-letter currency,
/// transfer-needs-destination, high-risk-needs-remarks, …) are enforced by
/// the external validation layer before a record reaches this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Ledger-assigned identifier
    pub id: TransactionId,

    /// Monetary amount (positive, currency-scaled)
    pub amount: Decimal,

    /// Transaction type
    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    /// Source account number
    pub source_account_number: AccountId,

    /// Destination account number (required for transfers, upstream rule)
    pub destination_account_number: Option<AccountId>,

    /// 3-letter currency code
    pub currency: CurrencyCode,

    /// Exchange rate for foreign-currency transactions
    pub exchange_rate: Option<Decimal>,

    /// Business category
    pub category: TransactionCategory,

    /// Free-text description
    pub description: Option<String>,

    /// Creation instant, assigned from the ledger's clock
    pub timestamp: DateTime<Utc>,

    /// Lifecycle status
    pub status: TransactionStatus,

    /// Assessed risk level
    pub risk_level: RiskLevel,

    /// External reference number
    pub reference_number: Option<String>,

    /// When processing finished
    pub processed_time: Option<DateTime<Utc>>,

    /// Who or what processed it
    pub processed_by: Option<String>,

    /// Operator remarks
    pub remarks: Option<String>,

    /// Whether the record has been reconciled
    #[serde(default)]
    pub is_reconciled: bool,

    /// Whether fraud is suspected
    #[serde(default)]
    pub is_fraud_suspected: bool,

    /// Originating IP address
    pub ip_address: Option<IpAddr>,

    /// Originating device descriptor
    pub device_info: Option<String>,
}

/// An unsaved transaction, as handed over by the (external) API layer.
///
/// Carries every business field of [`Transaction`] but no `id` and no
/// `timestamp`; the ledger assigns both. `status` is optional and
/// defaults to [`TransactionStatus::Initiated`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    /// Monetary amount (positive, currency-scaled)
    pub amount: Decimal,

    /// Transaction type
    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    /// Source account number
    pub source_account_number: AccountId,

    /// Destination account number
    pub destination_account_number: Option<AccountId>,

    /// 3-letter currency code
    pub currency: CurrencyCode,

    /// Exchange rate for foreign-currency transactions
    pub exchange_rate: Option<Decimal>,

    /// Business category
    pub category: TransactionCategory,

    /// Free-text description
    pub description: Option<String>,

    /// Lifecycle status; `None` means "let the ledger default it"
    pub status: Option<TransactionStatus>,

    /// Assessed risk level
    pub risk_level: RiskLevel,

    /// External reference number
    pub reference_number: Option<String>,

    /// When processing finished
    pub processed_time: Option<DateTime<Utc>>,

    /// Who or what processed it
    pub processed_by: Option<String>,

    /// Operator remarks
    pub remarks: Option<String>,

    /// Whether the record has been reconciled
    #[serde(default)]
    pub is_reconciled: bool,

    /// Whether fraud is suspected
    #[serde(default)]
    pub is_fraud_suspected: bool,

    /// Originating IP address
    pub ip_address: Option<IpAddr>,

    /// Originating device descriptor
    pub device_info: Option<String>,
}

impl Transaction {
    /// Materialize a draft into a stored record.
    ///
    /// `id` and `timestamp` come from the ledger; a missing status becomes
    /// [`TransactionStatus::Initiated`].
    pub fn from_draft(draft: TransactionDraft, id: TransactionId, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            amount: draft.amount,
            tx_type: draft.tx_type,
            source_account_number: draft.source_account_number,
            destination_account_number: draft.destination_account_number,
            currency: draft.currency,
            exchange_rate: draft.exchange_rate,
            category: draft.category,
            description: draft.description,
            timestamp,
            status: draft.status.unwrap_or(TransactionStatus::Initiated),
            risk_level: draft.risk_level,
            reference_number: draft.reference_number,
            processed_time: draft.processed_time,
            processed_by: draft.processed_by,
            remarks: draft.remarks,
            is_reconciled: draft.is_reconciled,
            is_fraud_suspected: draft.is_fraud_suspected,
            ip_address: draft.ip_address,
            device_info: draft.device_info,
        }
    }
}
