use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use crate::time::{SystemClock, TimeSource};

#[derive(Debug)]
struct Anchor {
    /// Wall-clock reading taken at construction, in ms since the Unix epoch.
    wall_millis: u64,
    start: Instant,
}

/// A wall-clock aligned time source that never moves backward.
///
/// The clock samples the system time once at construction and afterwards
/// advances only by the elapsed monotonic time (`Instant`). Adjustments to
/// the system clock after construction (NTP steps, manual changes) are not
/// observed, so generators built on it never report
/// [`Error::ClockMovedBackwards`]. The trade-off is drift: a long-running
/// process slowly diverges from the true wall time.
///
/// Clones share the same anchor and therefore agree on the current time.
///
/// # Example
///
/// ```
/// use flakegen::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(2));
/// let b = clock.current_millis();
/// assert!(b >= a);
/// ```
///
/// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    anchor: Arc<Anchor>,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock to the current system time.
    pub fn new() -> Self {
        Self::with_anchor(SystemClock::now_millis())
    }

    /// Anchors a new clock to an explicit wall-clock reading, in
    /// milliseconds since the Unix epoch.
    pub fn with_anchor(wall_millis: u64) -> Self {
        Self {
            anchor: Arc::new(Anchor {
                wall_millis,
                start: Instant::now(),
            }),
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        let elapsed = u64::try_from(self.anchor.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.anchor.wall_millis.saturating_add(elapsed)
    }
}
