use core::{cell::Cell, time::Duration};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::Result,
    generator::{
        GeneratorConfig, IdGenerator, Poll,
        state::{Advance, Node, State},
    },
    id::IdCodec,
    time::{SystemClock, TimeSource},
};

/// A non-concurrent ID generator suitable for single-threaded environments.
///
/// This generator is lightweight and fast, but **not thread-safe**: its state
/// lives in a [`Cell`], so the type is `!Sync` and concurrent use is ruled
/// out at compile time. Wrap it in your own lock, or use one generator per
/// thread with distinct machine IDs, if several threads need IDs.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Any [`BitLayout`] that fits in 63 bits
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockIdGenerator`]
/// - [`AtomicIdGenerator`]
///
/// [`BitLayout`]: crate::BitLayout
/// [`LockIdGenerator`]: crate::LockIdGenerator
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
pub struct BasicIdGenerator<T>
where
    T: TimeSource,
{
    state: Cell<State>,
    node: Node,
    stall_timeout: Duration,
    time: T,
}

impl BasicIdGenerator<SystemClock> {
    /// Creates a generator on the system clock with the default epoch and
    /// layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either ID is out of range.
    ///
    /// [`Error::Config`]: crate::Error::Config
    pub fn with_ids(datacenter_id: u64, machine_id: u64) -> Result<Self> {
        let config = GeneratorConfig::default()
            .with_datacenter_id(datacenter_id)
            .with_machine_id(machine_id);
        Self::new(config, SystemClock)
    }
}

impl<T> BasicIdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`BasicIdGenerator`] from a validated configuration.
    ///
    /// No identifier has been issued yet, so the first call to
    /// [`IdGenerator::generate`] always starts at sequence zero. The clock
    /// is not read here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the layout or either location ID is
    /// invalid.
    ///
    /// # Example
    /// ```
    /// use flakegen::{BasicIdGenerator, GeneratorConfig, IdGenerator, MonotonicClock};
    ///
    /// let generator = BasicIdGenerator::new(GeneratorConfig::default(), MonotonicClock::new()).unwrap();
    /// let first = generator.generate().unwrap();
    /// let second = generator.generate().unwrap();
    /// assert!(first < second);
    /// ```
    ///
    /// [`Error::Config`]: crate::Error::Config
    pub fn new(config: GeneratorConfig, time: T) -> Result<Self> {
        Ok(Self {
            state: Cell::new(State::default()),
            node: Node::new(&config)?,
            stall_timeout: config.stall_timeout,
            time,
        })
    }

    /// Timestamp of the last issued identifier, in milliseconds since the
    /// Unix epoch.
    pub fn last_timestamp(&self) -> Option<u64> {
        self.state.get().last_timestamp
    }

    /// Sequence of the last issued identifier.
    pub fn sequence(&self) -> u64 {
        self.state.get().sequence
    }
}

impl<T> IdGenerator for BasicIdGenerator<T>
where
    T: TimeSource,
{
    fn codec(&self) -> &IdCodec {
        &self.node.codec
    }

    fn stall_timeout(&self) -> Duration {
        self.stall_timeout
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn poll_id(&self) -> Result<Poll> {
        let now = self.time.current_millis();
        match self.node.advance(self.state.get(), now)? {
            Advance::Issued { id, next } => {
                self.state.set(next);
                Ok(Poll::Ready { id })
            }
            Advance::Exhausted { last } => Ok(Poll::Pending {
                yield_for: 1,
                last_timestamp: last,
            }),
        }
    }
}
