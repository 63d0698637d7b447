//! Transaction Ledger Core
//!
//! In-memory transaction ledger with unique id assignment and protection
//! against rapid duplicate submissions.
//!
//! # Architecture
//!
//! - **Snowflake ids**: 64-bit time-ordered identifiers issued without
//!   coordination, unique for the process lifetime
//! - **Concurrent store**: sharded map with clone-out reads and atomic
//!   full-value slot swaps
//! - **Duplicate guard**: fingerprint index catching equivalent
//!   submissions inside a short window, best-effort under races
//! - **Injected time**: every timestamp and window comparison flows
//!   through a [`Clock`], so tests never sleep
//!
//! The crate is a passive, thread-safe, synchronous library: no
//! background threads, no I/O, no async runtime. HTTP routing, field
//! validation and status-code mapping belong to the calling layer; this
//! core consumes already validated drafts and hands back typed results.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod clock;
pub mod id;
pub mod store;
pub mod dedup;
pub mod page;
pub mod ledger;
pub mod error;
pub mod config;
pub mod metrics;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use id::IdGenerator;
pub use ledger::Ledger;
pub use metrics::LedgerMetrics;
pub use page::Page;
pub use types::{
    AccountId, CurrencyCode, RiskLevel, Transaction, TransactionCategory, TransactionDraft,
    TransactionId, TransactionStatus, TransactionType,
};
