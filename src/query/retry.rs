// Bounded retry for query fetches.
// Every failure except a 404 or 403 is retried with exponential backoff.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::config::DashboardConfig;
use crate::error::{DashError, Result};

/// Configuration for retry operations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Minimum delay between retries.
    pub min_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Attempts made after the first failure.
    pub max_retries: usize,
    /// Whether to add jitter to delays.
    pub with_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            min_delay: config.retry_min_delay,
            max_delay: config.retry_max_delay,
            max_retries: config.max_retries,
            with_jitter: true,
        }
    }

    /// Build an exponential backoff strategy from this policy.
    #[must_use]
    pub fn backoff(&self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        if self.with_jitter {
            builder = builder.with_jitter();
        }

        builder
    }

    pub fn should_retry(error: &DashError) -> bool {
        error.is_retryable()
    }

    /// Run `operation`, retrying transient failures. `what` labels log lines.
    pub async fn run<T, F, Fut>(&self, what: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempt = AtomicU32::new(0);

        let op = || {
            attempt.fetch_add(1, Ordering::SeqCst);
            operation()
        };

        op.retry(self.backoff())
            .when(Self::should_retry)
            .notify(|err, dur| {
                tracing::debug!(
                    "{} failed, retrying in {:?} (attempt {}): {}",
                    what,
                    dur,
                    attempt.load(Ordering::SeqCst),
                    err
                );
            })
            .await
    }
}
