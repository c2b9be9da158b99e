//! Retry and circuit breaking composed for one downstream dependency

use std::future::Future;
use std::sync::Arc;

use crate::errors::DomainResult;

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use super::registry::CircuitBreakerRegistry;
use super::retry::{RetryConfig, RetryPolicy};

/// Binds one named circuit breaker and one retry policy.
///
/// Retries run inside the breaker, so the breaker records one aggregate
/// outcome per `execute_with_resilience` call: transient failures that the
/// retry absorbs never count against the failure threshold, only a call
/// whose retries are exhausted (or whose error is not retryable) does.
#[derive(Debug)]
pub struct ResilientService {
    breaker: Arc<CircuitBreaker>,
    retry: RetryPolicy,
}

impl ResilientService {
    /// Creates a resilient wrapper from existing components.
    pub fn new(breaker: Arc<CircuitBreaker>, retry: RetryPolicy) -> Self {
        Self { breaker, retry }
    }

    /// Registers a breaker under `name` and builds the wrapper around it.
    ///
    /// Fails when the name is already registered or the retry
    /// configuration is invalid.
    pub fn register(
        registry: &CircuitBreakerRegistry,
        name: &str,
        breaker_config: CircuitBreakerConfig,
        retry_config: RetryConfig,
    ) -> DomainResult<Self> {
        let breaker = registry.register(name, breaker_config)?;
        let retry = RetryPolicy::new(retry_config)?;
        Ok(Self { breaker, retry })
    }

    /// Executes an operation with retry inside circuit breaking.
    ///
    /// While the breaker is open the operation is never invoked.
    pub async fn execute_with_resilience<F, Fut, T>(&self, operation: F) -> DomainResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        self.breaker.execute(self.retry.execute(operation)).await
    }

    /// The underlying breaker, for state inspection and forced overrides.
    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DomainError, ResilienceError};
    use crate::resilience::circuit_breaker::CircuitState;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            ..RetryConfig::default()
        }
    }

    fn tight_breaker() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: 2,
            success_threshold: 1,
            timeout: Duration::from_secs(60),
        }
    }

    fn transient_error() -> DomainError {
        DomainError::Internal {
            message: "connection reset".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn absorbed_retries_do_not_count_against_the_breaker() {
        let registry = CircuitBreakerRegistry::new();
        let service =
            ResilientService::register(&registry, "inventory", tight_breaker(), fast_retry(3))
                .unwrap();

        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = service
            .execute_with_resilience(|| {
                let counter = counter.clone();
                async move {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt < 3 {
                        Err(transient_error())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 3);
        let metrics = service.breaker().metrics();
        assert_eq!(metrics.state, CircuitState::Closed);
        assert_eq!(metrics.failure_count, 0);
        assert_eq!(metrics.total_requests, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_count_once_per_call() {
        let registry = CircuitBreakerRegistry::new();
        let service =
            ResilientService::register(&registry, "inventory", tight_breaker(), fast_retry(3))
                .unwrap();

        let calls = Arc::new(AtomicU32::new(0));

        for _ in 0..2 {
            let counter = calls.clone();
            let err = service
                .execute_with_resilience(|| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Err::<u32, _>(transient_error())
                    }
                })
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                DomainError::Resilience(ResilienceError::RetryExhausted { .. })
            ));
        }

        // Six operation invocations, but only two breaker failures.
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(service.breaker().state(), CircuitState::Open);

        // While open, the operation itself is never invoked.
        let counter = calls.clone();
        let err = service
            .execute_with_resilience(|| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, DomainError>(1)
                }
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Resilience(ResilienceError::CircuitOpen { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn registration_reuses_the_registry_rules() {
        let registry = CircuitBreakerRegistry::new();
        ResilientService::register(&registry, "inventory", tight_breaker(), fast_retry(3))
            .unwrap();

        let err =
            ResilientService::register(&registry, "inventory", tight_breaker(), fast_retry(3))
                .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Resilience(ResilienceError::DuplicateBreaker { .. })
        ));
    }
}
