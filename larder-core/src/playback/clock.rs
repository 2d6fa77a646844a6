//! Async clock that feeds ticks into a [`Playback`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::Playback;

/// A background task that sends one tick per period.
///
/// Dropping the ticker aborts the task and discards any tick not yet
/// received.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
    rx: mpsc::Receiver<()>,
}

impl Ticker {
    /// Start ticking; the first tick arrives one full period from now.
    pub fn start(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { handle, rx }
    }

    /// Wait for the next tick. Returns `None` if the task has stopped.
    pub async fn tick(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Keeps a [`Ticker`] running exactly while a playback countdown runs.
///
/// Call [`PlaybackClock::sync`] after every event handled by the
/// playback; it starts a ticker for a new countdown and drops the ticker
/// as soon as the countdown stops, expires, or the view moves on.
#[derive(Debug)]
pub struct PlaybackClock {
    period: Duration,
    ticker: Option<(u64, Ticker)>,
}

impl PlaybackClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            ticker: None,
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn sync(&mut self, playback: &Playback) {
        if !playback.wants_clock() {
            if self.ticker.take().is_some() {
                tracing::debug!("clock stopped");
            }
            return;
        }

        let epoch = playback.timer_epoch();
        let current = self.ticker.as_ref().map(|(e, _)| *e);
        if current != Some(epoch) {
            tracing::debug!(epoch, "clock started");
            self.ticker = Some((epoch, Ticker::start(self.period)));
        }
    }

    /// Resolve on the next tick, or never if no countdown is running.
    pub async fn next_tick(&mut self) {
        match self.ticker.as_mut() {
            Some((_, ticker)) => {
                if ticker.tick().await.is_none() {
                    self.ticker = None;
                    std::future::pending::<()>().await;
                }
            }
            None => std::future::pending().await,
        }
    }
}
