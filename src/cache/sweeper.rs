//! Periodic expiry sweep

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use super::{SharedCache, Weigh};

/// Run `cleanup` every `every` until the handle is aborted
pub fn spawn_cleanup<V>(cache: SharedCache<V>, every: Duration) -> JoinHandle<()>
where
    V: Clone + Weigh + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = cache.cleanup();
            if removed > 0 {
                info!(removed, remaining = cache.len(), "cache sweep");
            } else {
                debug!("cache sweep found nothing expired");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, ResultCache};
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_expired_entries() {
        let clock = Arc::new(ManualClock::new());
        let cache: SharedCache<String> = Arc::new(ResultCache::with_clock(
            NonZeroUsize::new(8).unwrap(),
            Duration::from_secs(1),
            clock.clone(),
        ));
        cache.set("stale", "x".to_string(), None);
        cache.set("fresh", "y".to_string(), Some(Duration::from_secs(3600)));

        let every = Duration::from_secs(300);
        let handle = spawn_cleanup(cache.clone(), every);

        clock.advance(Duration::from_secs(2));
        tokio::time::sleep(every + every / 2).await;

        assert_eq!(cache.len(), 1);
        assert!(cache.has("fresh"));
        assert_eq!(cache.stats().misses, 0);

        handle.abort();
    }
}
