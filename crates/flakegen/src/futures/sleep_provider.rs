use core::{future::Future, time::Duration};

/// How an async generator waits while its sequence is exhausted.
///
/// Implementations exist for Tokio and Smol behind the `async-tokio` and
/// `async-smol` features; any runtime can be plugged in by implementing this
/// trait.
pub trait SleepProvider {
    /// Returns a future that completes once the caller may poll again. The
    /// future must be `Send` so generation can run on multi-threaded
    /// executors.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
