//! Cancellable hold timer
//!
//! Schedules a one-shot expiry that is delivered back to the state machine's
//! own task as a message. The timer never touches shake state itself.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Expiry message tagged with the generation it was armed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldExpired {
    pub generation: u64,
}

/// Schedules hold expiries onto a channel
#[derive(Debug, Clone)]
pub struct HoldTimer {
    expiry_tx: mpsc::Sender<HoldExpired>,
}

impl HoldTimer {
    pub fn new(expiry_tx: mpsc::Sender<HoldExpired>) -> Self {
        Self { expiry_tx }
    }

    /// Schedule an expiry for `generation` after `after` elapses
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, after: Duration, generation: u64) -> TimerHandle {
        let expiry_tx = self.expiry_tx.clone();
        let deadline = Instant::now().checked_add(after);

        let task = tokio::spawn(async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                // Past the clock's range; sleep clamps this to its far future
                None => tokio::time::sleep(after).await,
            }
            if expiry_tx.send(HoldExpired { generation }).await.is_err() {
                debug!(generation, "hold expiry receiver gone");
            }
        });

        TimerHandle {
            generation,
            task: Some(task),
        }
    }
}

/// Handle to a scheduled expiry; cancelled on drop
#[derive(Debug)]
pub struct TimerHandle {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Cancel the expiry if it has not been delivered yet
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!(generation = self.generation, "hold timer cancelled");
            }
            task.abort();
        }
    }
}

#[cfg(test)]
impl TimerHandle {
    fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_duration() {
        let (tx, mut rx) = mpsc::channel(4);
        let timer = HoldTimer::new(tx);

        let handle = timer.schedule(Duration::from_secs(3), 7);
        assert_eq!(handle.generation, 7);
        settle().await;

        tokio::time::advance(Duration::from_millis(2999)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
        assert!(handle.is_pending());

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Ok(HoldExpired { generation: 7 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_expiry() {
        let (tx, mut rx) = mpsc::channel(4);
        let timer = HoldTimer::new(tx);

        let mut handle = timer.schedule(Duration::from_secs(3), 1);
        handle.cancel();
        assert!(!handle.is_pending());

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (tx, mut rx) = mpsc::channel(4);
        let timer = HoldTimer::new(tx);

        drop(timer.schedule(Duration::from_secs(3), 1));

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }
}
