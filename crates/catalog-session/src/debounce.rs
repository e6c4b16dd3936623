//! Debounce scheduling.

use std::future::pending;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Holds the latest value of a burst until the input has been quiet for
/// `interval`.
///
/// Each `schedule` replaces the pending value and pushes the deadline back.
/// `fired` resolves with the value once the deadline passes.
#[derive(Debug)]
pub struct Debouncer<T> {
    interval: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Replace the pending value and restart the quiet interval.
    pub fn schedule(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.interval));
    }

    /// Drop the pending value, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value fires.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Wait for the pending value to fire and take it.
    ///
    /// Never resolves while nothing is pending. Cancel safe: dropping the
    /// future leaves the pending value in place.
    pub async fn fired(&mut self) -> T {
        let Some(deadline) = self.deadline() else {
            return pending().await;
        };
        sleep_until(deadline).await;
        match self.pending.take() {
            Some((value, _)) => value,
            None => pending().await,
        }
    }
}
