#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

use crate::time::TimeSource;

/// The operating system's wall clock.
///
/// Readings follow every adjustment made to the system time, including NTP
/// steps backwards. Generators report such a step as
/// [`Error::ClockMovedBackwards`]; use [`MonotonicClock`] if that is not
/// acceptable.
///
/// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub(crate) fn now_millis() -> u64 {
        // A system clock set before 1970 reads as the Unix epoch itself.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default()
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        Self::now_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_EPOCH;

    #[test]
    fn reads_after_the_default_epoch() {
        assert!(SystemClock.current_millis() > DEFAULT_EPOCH);
    }
}
