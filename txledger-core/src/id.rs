//! Snowflake-style transaction id generation
//!
//! Issues 64-bit ids that are unique for the process lifetime and roughly
//! time-ordered:
//!
//! ```text
//! | 41 bits: timestamp (ms since epoch) | 10 bits: node | 12 bits: sequence |
//! ```
//!
//! - **Timestamp**: milliseconds since 2024-01-01 00:00:00 UTC
//! - **Node**: fixed discriminator from [`Config`](crate::Config), so
//!   processes sharing an id space never collide
//! - **Sequence**: counter within each millisecond (4096 ids/ms per node)
//!
//! The top bit stays clear, keeping ids positive when callers hold them as
//! signed 64-bit integers.
//!
//! All generator state lives behind one `parking_lot::Mutex`; concurrent
//! callers serialize on it and can never observe torn state or receive
//! colliding ids. When the per-millisecond sequence space is exhausted the
//! generator spins until the clock reaches the next millisecond. A clock
//! that runs backwards by more than a small tolerance is fatal: the
//! generator refuses to issue ids rather than risk a collision.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::types::TransactionId;
use parking_lot::Mutex;
use std::sync::Arc;

/// Custom epoch: 2024-01-01 00:00:00 UTC (milliseconds since Unix epoch)
const EPOCH_MS: i64 = 1_704_067_200_000;

/// Number of bits used for the node discriminator
const NODE_BITS: u32 = 10;

/// Number of bits used for the sequence portion
const SEQUENCE_BITS: u32 = 12;

/// Mask for the node portion (10 bits)
const NODE_MASK: u64 = (1 << NODE_BITS) - 1;

/// Mask for the sequence portion (12 bits)
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// Bit offset of the timestamp portion
const TIMESTAMP_SHIFT: u32 = NODE_BITS + SEQUENCE_BITS;

/// Backwards clock drift tolerated before the generator fails fast (ms).
/// Small NTP slews continue through the sequence counter; anything larger
/// risks reissuing a timestamp and is refused.
const CLOCK_DRIFT_TOLERANCE_MS: i64 = 5;

/// Generator state updated inside the critical section
struct GeneratorState {
    /// Last timestamp an id was issued for (ms since [`EPOCH_MS`])
    last_ms: i64,
    /// Sequence counter within `last_ms`
    sequence: u64,
}

/// Thread-safe Snowflake-style id generator
pub struct IdGenerator {
    node_id: u64,
    clock: Arc<dyn Clock>,
    state: Mutex<GeneratorState>,
}

impl IdGenerator {
    /// Create a generator for the given node discriminator (0..1024)
    pub fn new(node_id: u16, clock: Arc<dyn Clock>) -> Result<Self> {
        if u64::from(node_id) > NODE_MASK {
            return Err(Error::Config(format!(
                "node_id {} out of range (0..{})",
                node_id,
                NODE_MASK + 1
            )));
        }
        Ok(Self {
            node_id: u64::from(node_id),
            clock,
            state: Mutex::new(GeneratorState {
                last_ms: 0,
                sequence: 0,
            }),
        })
    }

    /// Issue the next id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] when the clock reads more than
    /// the drift tolerance behind the last issued timestamp (or before
    /// the id epoch). This is fatal for the uniqueness invariant, not a
    /// retryable condition.
    pub fn next_id(&self) -> Result<TransactionId> {
        let mut state = self.state.lock();
        let mut now_ms = self.clock_ms()?;

        if now_ms < state.last_ms {
            let drift_ms = state.last_ms - now_ms;
            if drift_ms > CLOCK_DRIFT_TOLERANCE_MS {
                return Err(Error::ClockRegression { drift_ms });
            }
            // Small slew: keep issuing against the last-seen millisecond.
            now_ms = state.last_ms;
        }

        if now_ms == state.last_ms {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // 4096 ids issued in this millisecond: wait out the tick.
                state.last_ms = self.next_millis(state.last_ms)?;
            }
        } else {
            state.last_ms = now_ms;
            state.sequence = 0;
        }

        let id = ((state.last_ms as u64) << TIMESTAMP_SHIFT)
            | (self.node_id << SEQUENCE_BITS)
            | state.sequence;
        Ok(TransactionId::new(id))
    }

    /// Current clock reading in milliseconds since the id epoch
    fn clock_ms(&self) -> Result<i64> {
        let ms = self.clock.now().timestamp_millis() - EPOCH_MS;
        if ms < 0 {
            return Err(Error::ClockRegression { drift_ms: -ms });
        }
        Ok(ms)
    }

    /// Spin until the clock passes `last_ms`.
    ///
    /// Sub-millisecond with a live clock. Bails out with
    /// [`Error::ClockRegression`] if the clock falls back beyond tolerance
    /// while waiting.
    fn next_millis(&self, last_ms: i64) -> Result<i64> {
        loop {
            let ms = self.clock_ms()?;
            if ms > last_ms {
                return Ok(ms);
            }
            if last_ms - ms > CLOCK_DRIFT_TOLERANCE_MS {
                return Err(Error::ClockRegression {
                    drift_ms: last_ms - ms,
                });
            }
            std::hint::spin_loop();
        }
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("node_id", &self.node_id)
            .finish_non_exhaustive()
    }
}

/// Extract the timestamp portion of an id (ms since the id epoch)
pub fn extract_timestamp(id: TransactionId) -> u64 {
    id.as_u64() >> TIMESTAMP_SHIFT
}

/// Extract the node discriminator portion of an id
pub fn extract_node(id: TransactionId) -> u64 {
    (id.as_u64() >> SEQUENCE_BITS) & NODE_MASK
}

/// Extract the sequence portion of an id
pub fn extract_sequence(id: TransactionId) -> u64 {
    id.as_u64() & SEQUENCE_MASK
}
