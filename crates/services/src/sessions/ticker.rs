use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Wall-clock period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One elapsed period, as observed by the ticker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick;

/// Background task that emits a `ClockTick` every period.
///
/// The task holds only the sending half of the channel. Cancelling (or
/// dropping) the ticker aborts the task, which closes the channel once any
/// already-queued ticks are drained.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn onto the current tokio runtime. The first tick arrives after one period.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(period: Duration) -> (Self, mpsc::UnboundedReceiver<ClockTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(ClockTick).is_err() {
                    break;
                }
            }
        });
        (Self { handle }, rx)
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_until_cancelled() {
        let (ticker, mut rx) = Ticker::spawn(TICK_PERIOD);
        let start = Instant::now();

        assert_eq!(rx.recv().await, Some(ClockTick));
        assert_eq!(start.elapsed(), TICK_PERIOD);
        assert_eq!(rx.recv().await, Some(ClockTick));
        assert_eq!(start.elapsed(), TICK_PERIOD * 2);

        ticker.cancel();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_receiver_is_dropped() {
        let (ticker, rx) = Ticker::spawn(TICK_PERIOD);
        drop(rx);
        tokio::time::sleep(TICK_PERIOD * 2).await;
        assert!(ticker.is_finished());
    }
}
