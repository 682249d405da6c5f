//! Deadlines and bounded retries for upstream calls.

use rand::Rng;
use std::future::Future;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};

/// Outcome of a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// Worth retrying: transport failure, deadline, 5xx.
    Transient(String),
    /// Retrying cannot help: 4xx, unparsable body.
    Permanent(String),
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptError::Transient(msg) => write!(f, "{} (transient)", msg),
            AttemptError::Permanent(msg) => write!(f, "{}", msg),
        }
    }
}

/// Per-attempt deadline plus capped exponential backoff with jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    timeout: Duration,
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(
        timeout: Duration,
        max_retries: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
    ) -> Self {
        Self {
            timeout,
            max_retries,
            initial_backoff,
            max_backoff,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(
            config.request_timeout(),
            config.max_retries,
            config.initial_backoff(),
            config.max_backoff(),
        )
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Run `attempt` until it succeeds, fails permanently, or retries run out.
    ///
    /// Every failure is reported as [`AppError::Upstream`] naming `service`.
    pub async fn run<T, F, Fut>(&self, service: &str, mut attempt: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let mut delay = self.initial_backoff;

        for attempt_no in 0..=self.max_retries {
            let outcome = match tokio::time::timeout(self.timeout, attempt()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(AttemptError::Transient(format!(
                    "no response within {:?}",
                    self.timeout
                ))),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(AttemptError::Transient(e)) if attempt_no < self.max_retries => {
                    tracing::warn!(
                        service,
                        attempt = attempt_no + 1,
                        max_retries = self.max_retries,
                        error = %e,
                        "Upstream call failed, retrying"
                    );
                    tokio::time::sleep(with_jitter(delay)).await;
                    delay = std::cmp::min(delay * 2, self.max_backoff);
                }
                Err(e) => {
                    tracing::error!(service, error = %e, "Upstream call failed");
                    return Err(AppError::Upstream(format!("{}: {}", service, e)));
                }
            }
        }

        Err(AppError::Upstream(format!("{}: retries exhausted", service)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(30),
            2,
            Duration::from_millis(250),
            Duration::from_secs(4),
        )
    }
}

/// `delay` plus up to half of it again.
fn with_jitter(delay: Duration) -> Duration {
    let max_ms = u64::try_from(delay.as_millis() / 2).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return delay;
    }
    delay + Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}
