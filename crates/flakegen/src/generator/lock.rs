use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::Result,
    generator::{
        GeneratorConfig, IdGenerator, Mutex, MutexGuard, Poll,
        state::{Advance, Node, State},
    },
    id::IdCodec,
    time::{SystemClock, TimeSource},
};

/// A lock-based ID generator suitable for multi-threaded environments.
///
/// The clock read, the comparison against the last timestamp, the sequence
/// update and the packing all happen while holding one [`Mutex`], so
/// concurrent callers can never observe each other's half-applied state.
/// While the sequence is exhausted the lock is released between polls, so a
/// waiting caller never blocks the others.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Any [`BitLayout`] that fits in 63 bits
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Your target doesn't support 64-bit atomics
///
/// ## See Also
/// - [`BasicIdGenerator`]
/// - [`AtomicIdGenerator`]
///
/// [`BitLayout`]: crate::BitLayout
/// [`BasicIdGenerator`]: crate::BasicIdGenerator
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
pub struct LockIdGenerator<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<State>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<State>,
    node: Node,
    stall_timeout: Duration,
    time: T,
}

impl LockIdGenerator<SystemClock> {
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

impl<T> LockIdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`LockIdGenerator`] from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the layout or either location ID is
    /// invalid.
    ///
    /// # Example
    /// ```
    /// use std::{collections::HashSet, sync::Mutex, thread};
    /// use flakegen::{GeneratorConfig, IdGenerator, LockIdGenerator, MonotonicClock};
    ///
    /// let generator = LockIdGenerator::new(GeneratorConfig::default(), MonotonicClock::new()).unwrap();
    /// let seen = Mutex::new(HashSet::new());
    ///
    /// thread::scope(|s| {
    ///     for _ in 0..4 {
    ///         s.spawn(|| {
    ///             for _ in 0..100 {
    ///                 let id = generator.generate().unwrap();
    ///                 assert!(seen.lock().unwrap().insert(id));
    ///             }
    ///         });
    ///     }
    /// });
    /// assert_eq!(seen.lock().unwrap().len(), 400);
    /// ```
    ///
    /// [`Error::Config`]: crate::Error::Config
    pub fn new(config: GeneratorConfig, time: T) -> Result<Self> {
        let state = Mutex::new(State::default());
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(state),
            #[cfg(not(feature = "cache-padded"))]
            state,
            node: Node::new(&config)?,
            stall_timeout: config.stall_timeout,
            time,
        })
    }

    /// Timestamp of the last issued identifier, in milliseconds since the
    /// Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the lock is poisoned.
    ///
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    pub fn last_timestamp(&self) -> Result<Option<u64>> {
        Ok(self.lock()?.last_timestamp)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<T> IdGenerator for LockIdGenerator<T>
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
        let mut state = self.lock()?;
        // Read under the lock: a reading taken before acquiring it could be
        // older than a timestamp committed by the previous holder.
        let now = self.time.current_millis();
        match self.node.advance(*state, now)? {
            Advance::Issued { id, next } => {
                *state = next;
                Ok(Poll::Ready { id })
            }
            Advance::Exhausted { last } => Ok(Poll::Pending {
                yield_for: 1,
                last_timestamp: last,
            }),
        }
    }
}
