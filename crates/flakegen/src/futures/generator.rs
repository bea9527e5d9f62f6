use core::{future::Future, time::Duration};

use super::SleepProvider;
use crate::{
    error::Result,
    generator::{IdGenerator, Poll, StallTimer},
    id::FlakeId,
};

/// Extension trait for asynchronously generating identifiers.
///
/// Instead of spinning on the clock when the sequence is exhausted, the
/// future sleeps through the given [`SleepProvider`] and polls again. The
/// same stall bound as [`IdGenerator::generate`] applies.
pub trait IdGeneratorAsyncExt {
    /// Returns a future that resolves to the next available identifier.
    ///
    /// # Errors
    ///
    /// Everything [`IdGenerator::generate`] can return.
    fn generate_async<S>(&self) -> impl Future<Output = Result<FlakeId>> + Send
    where
        S: SleepProvider;
}

impl<G> IdGeneratorAsyncExt for G
where
    G: IdGenerator + Sync,
{
    fn generate_async<S>(&self) -> impl Future<Output = Result<FlakeId>> + Send
    where
        S: SleepProvider,
    {
        async {
            let mut timer = StallTimer::new(self.stall_timeout());
            loop {
                timer.before_poll();
                let dur = match self.poll_id()? {
                    Poll::Ready { id } => return Ok(id),
                    Poll::Pending {
                        yield_for,
                        last_timestamp,
                    } => {
                        timer.on_pending(yield_for, last_timestamp)?;
                        Duration::from_millis(yield_for)
                    }
                };
                S::sleep_for(dur).await;
            }
        }
    }
}
