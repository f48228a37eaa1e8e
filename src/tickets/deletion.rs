use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serenity::model::id::ChannelId;
use tokio::task::JoinHandle;

pub const DELETE_DELAY: Duration = Duration::from_secs(5);

// Scheduled deletions are held as task handles keyed by channel so a pending
// closure can be observed and cancelled (ticket reopened) before it fires.
pub struct DeletionScheduler {
    pending: Arc<DashMap<ChannelId, JoinHandle<()>>>,
}

impl DeletionScheduler {
    pub fn new() -> Self {
        Self { pending: Arc::new(DashMap::new()) }
    }

    pub fn schedule<F>(&self, channel_id: ChannelId, delay: Duration, delete: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let pending = self.pending.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            delete.await;
            pending.remove(&channel_id);
        });

        if let Some(old) = self.pending.insert(channel_id, handle) {
            old.abort();
        }
    }

    pub fn cancel(&self, channel_id: ChannelId) -> bool {
        match self.pending.remove(&channel_id) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, channel_id: ChannelId) -> bool {
        self.pending.contains_key(&channel_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use serenity::model::id::ChannelId;

    use super::DeletionScheduler;

    #[tokio::test]
    async fn runs_after_delay_then_clears() {
        let sched = DeletionScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        sched.schedule(ChannelId(1), Duration::from_millis(30), async move {
            flag.store(true, Ordering::SeqCst);
        });

        assert!(sched.is_pending(ChannelId(1)));
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(fired.load(Ordering::SeqCst));
        assert!(!sched.is_pending(ChannelId(1)));
    }

    #[tokio::test]
    async fn cancel_prevents_the_run() {
        let sched = DeletionScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        sched.schedule(ChannelId(2), Duration::from_millis(50), async move {
            flag.store(true, Ordering::SeqCst);
        });

        assert!(sched.cancel(ChannelId(2)));
        assert!(!sched.is_pending(ChannelId(2)));

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancel_after_firing_reports_false() {
        let sched = DeletionScheduler::new();

        sched.schedule(ChannelId(3), Duration::from_millis(20), async {});

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(!sched.cancel(ChannelId(3)));
    }

    #[tokio::test]
    async fn reschedule_replaces_the_pending_run() {
        let sched = DeletionScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        sched.schedule(ChannelId(4), Duration::from_millis(40), async move {
            flag.store(true, Ordering::SeqCst);
        });
        sched.schedule(ChannelId(4), Duration::from_millis(500), async {});

        tokio::time::sleep(Duration::from_millis(200)).await;

        // The first run was aborted by the replacement and never fired.
        assert!(!fired.load(Ordering::SeqCst));
        assert!(sched.is_pending(ChannelId(4)));

        assert!(sched.cancel(ChannelId(4)));
    }
}
