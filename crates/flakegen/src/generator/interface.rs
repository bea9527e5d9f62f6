#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use core::time::Duration;

use crate::{
    error::{Error, Result},
    id::{DecodedId, FlakeId, IdCodec},
};

/// Represents the result of a single, non-blocking attempt to generate an
/// identifier.
///
/// - [`Poll::Ready`] indicates a new ID was issued and the generator state
///   advanced.
/// - [`Poll::Pending`] means the sequence for the current millisecond is
///   exhausted (or, for the atomic generator, another thread won the race)
///   and nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: FlakeId,
    },
    /// No ID could be generated yet.
    Pending {
        /// Suggested number of milliseconds to wait before polling again.
        /// Zero means retry immediately.
        yield_for: u64,
        /// Timestamp whose sequence is used up, in milliseconds since the
        /// Unix epoch. When `yield_for` is zero this is the clock reading
        /// that lost the race instead.
        last_timestamp: u64,
    },
}

/// Bounds how long a caller waits on one exhausted millisecond.
///
/// Only time spent while the clock stays on the same exhausted timestamp
/// counts. Losing a race, or finding a later millisecond already used up by
/// other callers, restarts the timer.
#[derive(Debug)]
pub(crate) struct StallTimer {
    timeout: Duration,
    stalled_on: Option<(u64, Instant)>,
    polled_at: Option<Instant>,
}

impl StallTimer {
    pub(crate) const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            stalled_on: None,
            polled_at: None,
        }
    }

    /// Marks the start of a poll. The wait is measured up to this point,
    /// which precedes the poll's clock reading.
    pub(crate) fn before_poll(&mut self) {
        if self.stalled_on.is_some() {
            self.polled_at = Some(Instant::now());
        }
    }

    /// Records a pending poll.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockStalled`] once `last_timestamp` has stayed
    /// exhausted for longer than the timeout.
    pub(crate) fn on_pending(&mut self, yield_for: u64, last_timestamp: u64) -> Result<()> {
        if yield_for == 0 {
            self.stalled_on = None;
            self.polled_at = None;
            return Ok(());
        }
        match self.stalled_on {
            Some((stalled, since)) if stalled == last_timestamp => {
                let waited = self
                    .polled_at
                    .map_or_else(|| since.elapsed(), |at| at.saturating_duration_since(since));
                if waited > self.timeout {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(?waited, last_timestamp, "clock stalled while sequence exhausted");
                    return Err(Error::ClockStalled { waited });
                }
            }
            _ => {
                self.stalled_on = Some((last_timestamp, Instant::now()));
                self.polled_at = None;
            }
        }
        Ok(())
    }
}

/// A Snowflake-style identifier generator.
///
/// Implementors only provide the non-blocking [`IdGenerator::poll_id`] step
/// and their codec; waiting out an exhausted sequence and decoding are shared.
pub trait IdGenerator {
    /// The codec describing this generator's layout and epoch.
    fn codec(&self) -> &IdCodec;

    /// Bound on how long [`IdGenerator::generate`] keeps polling while the
    /// clock stays on an exhausted millisecond.
    fn stall_timeout(&self) -> Duration;

    /// Attempts to issue the next identifier without waiting.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] if the clock is behind the last
    ///   issued identifier
    /// - [`Error::ClockBeforeEpoch`] / [`Error::TimestampOverflow`] if the
    ///   clock cannot be represented in the timestamp field
    /// - [`Error::LockPoisoned`] for a poisoned lock-based generator
    ///
    /// The generator state is unchanged whenever an error is returned.
    fn poll_id(&self) -> Result<Poll>;

    /// Generates the next identifier, busy-waiting on the clock if the
    /// sequence for the current millisecond is exhausted.
    ///
    /// The wait is a tight [`core::hint::spin_loop`] poll: sub-millisecond
    /// latency at the cost of a busy core. It is bounded by
    /// [`IdGenerator::stall_timeout`].
    ///
    /// # Errors
    ///
    /// Everything [`IdGenerator::poll_id`] returns, plus
    /// [`Error::ClockStalled`] when the clock does not move past the
    /// exhausted millisecond within the bound.
    fn generate(&self) -> Result<FlakeId> {
        self.generate_with(|_| core::hint::spin_loop())
    }

    /// Like [`IdGenerator::generate`], but calls `f` with the suggested wait
    /// (in milliseconds) each time the generator is pending, so callers can
    /// yield or sleep instead of spinning.
    ///
    /// # Errors
    ///
    /// Same as [`IdGenerator::generate`].
    fn generate_with(&self, mut f: impl FnMut(u64)) -> Result<FlakeId> {
        let mut timer = StallTimer::new(self.stall_timeout());
        loop {
            timer.before_poll();
            match self.poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending {
                    yield_for,
                    last_timestamp,
                } => {
                    timer.on_pending(yield_for, last_timestamp)?;
                    f(yield_for);
                }
            }
        }
    }

    /// Splits an identifier issued under this generator's configuration into
    /// its fields. Does not read or modify the generator state.
    fn decode(&self, id: FlakeId) -> DecodedId {
        self.codec().decode(id)
    }
}
