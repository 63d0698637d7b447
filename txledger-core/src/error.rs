//! Error types for the ledger

use crate::types::TransactionId;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// `NotFound` and `DuplicateDetected` are expected, recoverable outcomes
/// reported to the caller; `ClockRegression` is fatal for the id
/// generator's uniqueness invariant and aborts the affected call.
#[derive(Error, Debug)]
pub enum Error {
    /// Operation referenced an id absent from the store
    #[error("transaction not found: {0}")]
    NotFound(TransactionId),

    /// Create rejected by the duplicate guard
    #[error("possible duplicate of transaction {existing} within {window_secs}-second window")]
    DuplicateDetected {
        /// The in-flight transaction the new submission collided with
        existing: TransactionId,
        /// The configured detection window
        window_secs: u64,
    },

    /// Wall clock observed running backwards beyond tolerance
    #[error("clock moved backwards by {drift_ms}ms; refusing to issue transaction ids")]
    ClockRegression {
        /// How far behind the last issued timestamp the clock now reads
        drift_ms: i64,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Metrics registration error
    #[error("metrics error: {0}")]
    Metrics(String),
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::Metrics(err.to_string())
    }
}
