//! Periodic Pull.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::reconciler::Reconciler;

/// Five minutes between Pulls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Handle to a running poll loop. Dropping it stops the loop.
pub struct PollHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the loop to stop without waiting for it.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Stop the loop and wait for it to exit.
    ///
    /// A Pull already in flight is allowed to finish first.
    pub async fn stop(&mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                log::warn!("Poll loop ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run a Pull every `period`, the first one a full period from now.
///
/// Must be called from within a tokio runtime. A zero period is raised to
/// one second.
pub fn start_polling(reconciler: Arc<Reconciler>, period: Duration) -> PollHandle {
    let period = if period.is_zero() {
        Duration::from_secs(1)
    } else {
        period
    };
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::info!("Polling remote every {}s", period.as_secs());

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    match reconciler.pull().await {
                        Ok(Ok(report)) => log::debug!(
                            "Scheduled pull added {} quotes",
                            report.added.len()
                        ),
                        Ok(Err(e)) => log::warn!("Scheduled pull failed: {}", e),
                        Err(e) => log::warn!("Scheduled pull task panicked: {}", e),
                    }
                }
            }
        }

        log::info!("Polling stopped");
    });

    PollHandle {
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::{BroadcastEvent, EventBus, SYNC_PULL};
    use crate::persistence::{MemoryStore, PersistenceAdapter};
    use crate::quotes::seed_quotes;
    use crate::surface::RecordingSurface;
    use crate::sync::reconciler::DEFAULT_REMOTE_LATENCY;
    use crate::sync::remote::SimulatedRemote;
    use crate::QuoteBoard;
    use tokio::sync::broadcast;

    fn setup() -> (Arc<QuoteBoard>, Arc<Reconciler>) {
        let (board, reconciler, _bus) = setup_with_bus();
        (board, reconciler)
    }

    fn setup_with_bus() -> (Arc<QuoteBoard>, Arc<Reconciler>, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let board = Arc::new(QuoteBoard::with_quotes(
            seed_quotes(),
            PersistenceAdapter::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new())),
            Arc::new(RecordingSurface::new()),
            Arc::clone(&bus),
        ));
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&board),
            Arc::new(SimulatedRemote::new()),
            Arc::clone(&bus),
            DEFAULT_REMOTE_LATENCY,
        ));
        (board, reconciler, bus)
    }

    fn drain_pulls(rx: &mut broadcast::Receiver<BroadcastEvent>) -> usize {
        let mut pulls = 0;
        while let Ok(event) = rx.try_recv() {
            if event.event_type == SYNC_PULL {
                pulls += 1;
            }
        }
        pulls
    }

    #[tokio::test(start_paused = true)]
    async fn first_pull_waits_a_full_period() {
        let (board, reconciler) = setup();
        let mut handle = start_polling(reconciler, DEFAULT_POLL_INTERVAL);

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert_eq!(board.len(), 8);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(board.len(), 10);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn pulls_once_per_period() {
        let (board, reconciler, bus) = setup_with_bus();
        let mut rx = bus.subscribe();
        let mut handle = start_polling(reconciler, DEFAULT_POLL_INTERVAL);

        tokio::time::sleep(Duration::from_secs(301)).await;
        assert_eq!(drain_pulls(&mut rx), 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(drain_pulls(&mut rx), 1);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(drain_pulls(&mut rx), 2);

        // Four pulls so far, only the first added anything
        assert_eq!(board.len(), 10);
        assert!(handle.is_running());
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_the_loop() {
        let (board, reconciler) = setup();
        let mut handle = start_polling(reconciler, DEFAULT_POLL_INTERVAL);
        assert!(handle.is_running());

        handle.stop().await;
        assert!(!handle.is_running());

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(board.len(), 8);
    }
}
