/// Default epoch: Friday, January 1, 2021 00:00:00 UTC, in milliseconds since
/// the Unix epoch.
pub const DEFAULT_EPOCH: u64 = 1_609_459_200_000;

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: u64 = 1_288_834_974_657;

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: u64 = 1_420_070_400_000;

/// The Unix epoch itself: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MILLIS: u64 = 0;

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock, a monotonic
/// clock, or a mocked time source in tests.
///
/// The unit is **milliseconds since the Unix epoch**, not since the
/// generator's custom epoch. Generators subtract their epoch themselves.
///
/// # Example
///
/// ```
/// use flakegen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
