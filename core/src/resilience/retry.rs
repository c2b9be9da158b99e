//! Bounded retry with exponential backoff and jitter

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::errors::{DomainError, DomainResult, ResilienceError};

/// Upper bound on the random jitter added to each backoff delay.
const MAX_JITTER_MS: u64 = 1_000;

/// Configuration for a retry policy
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Cap applied to every computed delay
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt
    pub backoff_multiplier: f64,
    /// Substring allow-list matched against error messages; `None` retries
    /// every error
    pub retryable_errors: Option<Vec<String>>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            retryable_errors: None,
        }
    }
}

/// Retry policy executing operations with exponential backoff
///
/// Stateless apart from its configuration; each `execute` call tracks its
/// own attempt count, so one policy can be shared across concurrent calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Creates a retry policy, validating the configuration.
    ///
    /// All configuration problems are reported together in
    /// `ResilienceError::InvalidRetryConfig`.
    pub fn new(config: RetryConfig) -> DomainResult<Self> {
        let mut problems = Vec::new();

        if config.max_attempts == 0 {
            problems.push("max_attempts must be at least 1".to_string());
        }
        if config.max_delay < config.base_delay {
            problems.push("max_delay must not be smaller than base_delay".to_string());
        }
        if config.backoff_multiplier < 1.0 {
            problems.push("backoff_multiplier must be at least 1.0".to_string());
        }

        if problems.is_empty() {
            Ok(Self { config })
        } else {
            Err(ResilienceError::InvalidRetryConfig { problems }.into())
        }
    }

    /// Executes an operation, retrying on retryable failures.
    ///
    /// Non-retryable errors propagate immediately and unwrapped, even when
    /// they happen on the final attempt. When every attempt fails with a
    /// retryable error, the final one is wrapped in
    /// `ResilienceError::RetryExhausted`.
    ///
    /// # Arguments
    /// * `operation` - Factory producing a fresh future per attempt
    pub async fn execute<F, Fut, T>(&self, operation: F) -> DomainResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "Operation recovered after retry");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if !self.is_retryable(&err) {
                        tracing::debug!(attempt, error = %err, "Error is not retryable");
                        return Err(err);
                    }

                    if attempt >= self.config.max_attempts {
                        tracing::warn!(
                            attempts = attempt,
                            error = %err,
                            "Retries exhausted"
                        );
                        return Err(ResilienceError::RetryExhausted {
                            attempts: attempt,
                            source: Box::new(err),
                        }
                        .into());
                    }

                    let delay = self.delay_for_attempt(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Checks an error against the retryable-error allow-list.
    fn is_retryable(&self, err: &DomainError) -> bool {
        match &self.config.retryable_errors {
            None => true,
            Some(patterns) => {
                let message = err.to_string();
                patterns.iter().any(|pattern| message.contains(pattern))
            }
        }
    }

    /// Delay before the retry following the given (1-based) failed attempt:
    /// `min(base * multiplier^(attempt-1) + jitter, max)`.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.config.base_delay.as_millis() as f64;
        let backoff = base * self.config.backoff_multiplier.powi(attempt as i32 - 1);
        let jitter = rand::thread_rng().gen_range(0..=MAX_JITTER_MS) as f64;
        let capped = (backoff + jitter).min(self.config.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}
