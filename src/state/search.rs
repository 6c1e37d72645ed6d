// Search input debouncing.
// A typed value settles only after it has been left alone for the debounce window.

use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, DateTime<Utc>)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new value, restarting the window.
    pub fn push(&mut self, value: T, now: DateTime<Utc>) {
        self.pending = Some((value, now));
    }

    /// The pending value, once its window has elapsed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<T> {
        let (_, since) = self.pending.as_ref()?;
        let waited = now.signed_duration_since(*since).to_std().ok()?;
        if waited < self.delay {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
