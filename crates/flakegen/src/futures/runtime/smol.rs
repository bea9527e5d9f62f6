use core::{future::Future, time::Duration};

use crate::futures::SleepProvider;

/// Waits on a Smol [`Timer`](smol::Timer) for the suggested duration.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        async move {
            smol::Timer::after(dur).await;
        }
    }
}

/// Ignores the suggested duration and yields to the Smol executor.
pub struct SmolYield;
impl SleepProvider for SmolYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        smol::future::yield_now()
    }
}
