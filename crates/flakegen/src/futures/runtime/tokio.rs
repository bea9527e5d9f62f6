use core::{future::Future, time::Duration};

use crate::futures::SleepProvider;

/// Waits on Tokio's timer for the suggested duration.
///
/// Needs a runtime with the time driver enabled.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(dur)
    }
}

/// Ignores the suggested duration and yields to the Tokio scheduler.
///
/// Pending generators are polled again as soon as the task is rescheduled,
/// which keeps latency low when few tasks compete for IDs but burns more CPU
/// than [`TokioSleep`] under heavy contention.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use futures::future::try_join_all;

    use super::*;
    use crate::{
        AtomicIdGenerator, BitLayout, DEFAULT_EPOCH, Error, FlakeId, GeneratorConfig,
        IdGenerator, IdGeneratorAsyncExt, LockIdGenerator, MonotonicClock, Result, TimeSource,
    };

    const TOTAL_IDS: usize = 4096 * 8;
    const NUM_TASKS: usize = 8;
    const IDS_PER_TASK: usize = TOTAL_IDS / NUM_TASKS;

    struct FixedTime;
    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            DEFAULT_EPOCH + 7
        }
    }

    async fn run_unique_across_tasks<G, S>(generator: G) -> Result<()>
    where
        G: IdGenerator + Send + Sync + 'static,
        S: SleepProvider + 'static,
    {
        let generator = Arc::new(generator);
        let tasks: Vec<_> = (0..NUM_TASKS)
            .map(|_| {
                let generator = Arc::clone(&generator);
                tokio::spawn(async move {
                    let mut ids = Vec::with_capacity(IDS_PER_TASK);
                    for _ in 0..IDS_PER_TASK {
                        ids.push(generator.generate_async::<S>().await?);
                    }
                    Ok::<_, Error>(ids)
                })
            })
            .collect();

        let mut seen: HashSet<FlakeId> = HashSet::with_capacity(TOTAL_IDS);
        for ids in try_join_all(tasks).await.unwrap() {
            for id in ids? {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), TOTAL_IDS);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn lock_generator_async_sleep() -> Result<()> {
        let generator = LockIdGenerator::new(GeneratorConfig::default(), MonotonicClock::new())?;
        run_unique_across_tasks::<_, TokioSleep>(generator).await
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn atomic_generator_async_yield() -> Result<()> {
        let generator = AtomicIdGenerator::new(GeneratorConfig::default(), MonotonicClock::new())?;
        run_unique_across_tasks::<_, TokioYield>(generator).await
    }

    #[tokio::test]
    async fn async_generation_is_bounded_by_the_stall_timeout() -> Result<()> {
        let config = GeneratorConfig::default()
            .with_layout(BitLayout::new(41, 5, 5, 1))
            .with_stall_timeout(core::time::Duration::from_millis(5));
        let generator = LockIdGenerator::new(config, FixedTime)?;

        generator.generate_async::<TokioSleep>().await?;
        generator.generate_async::<TokioSleep>().await?;
        assert!(matches!(
            generator.generate_async::<TokioSleep>().await,
            Err(Error::ClockStalled { .. })
        ));
        Ok(())
    }
}
