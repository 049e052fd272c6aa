//! Cancellable fixed-interval scheduler

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// Create the shutdown signal pair used by the scheduling loops
#[must_use]
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Fixed-interval ticker that runs a cycle, sleeps, and repeats until the
/// shutdown signal fires
///
/// Cycles never overlap: the sleep starts only after the previous cycle
/// has fully completed, so a long-running cycle simply delays the next.
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Drive `cycle` until shutdown
    ///
    /// The first cycle runs immediately. Shutdown is observed between
    /// cycles and during the sleep, not inside a running cycle.
    pub async fn run<F, Fut>(&self, mut shutdown: watch::Receiver<bool>, mut cycle: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            if *shutdown.borrow() {
                return;
            }

            cycle().await;

            let sleep = tokio::time::sleep(self.interval);
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    () = &mut sleep => break,
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_on_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = shutdown_channel();
        let scheduler = Scheduler::new(Duration::from_secs(60));

        let counter = count.clone();
        let handle = tokio::spawn(async move {
            scheduler
                .run(rx, move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                })
                .await;
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_during_sleep_stops_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = shutdown_channel();
        let scheduler = Scheduler::new(Duration::from_secs(3600));

        let counter = count.clone();
        let handle = tokio::spawn(async move {
            scheduler
                .run(rx, move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                })
                .await;
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pre_signalled_shutdown_runs_nothing() {
        let count = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = shutdown_channel();
        tx.send(true).unwrap();

        let counter = count.clone();
        Scheduler::new(Duration::from_secs(1))
            .run(rx, move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
