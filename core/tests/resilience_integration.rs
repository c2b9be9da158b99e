//! Integration test composing the retry policy, circuit breaker registry
//! and resilient wrapper the way an application would wire them.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sf_core::errors::{DomainError, ResilienceError};
use sf_core::resilience::{
    CircuitBreakerConfig, CircuitBreakerRegistry, CircuitState, ResilientService, RetryConfig,
};

type BoxedCall = std::pin::Pin<Box<dyn std::future::Future<Output = Result<u32, DomainError>> + Send>>;

/// Operation failing `failures_before_success` times before succeeding,
/// counting every invocation.
fn flaky_dependency(calls: Arc<AtomicU32>, failures_before_success: u32) -> impl Fn() -> BoxedCall {
    move || {
        let calls = calls.clone();
        Box::pin(async move {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= failures_before_success {
                Err(DomainError::Internal {
                    message: "connection refused".to_string(),
                })
            } else {
                Ok(attempt)
            }
        })
    }
}

#[tokio::test(start_paused = true)]
async fn flaky_dependency_recovers_without_tripping_the_breaker() {
    let registry = CircuitBreakerRegistry::new();
    let service = ResilientService::register(
        &registry,
        "payments",
        CircuitBreakerConfig {
            failure_threshold: 2,
            success_threshold: 1,
            timeout: Duration::from_secs(60),
        },
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            ..RetryConfig::default()
        },
    )
    .unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let result = service
        .execute_with_resilience(flaky_dependency(calls.clone(), 2))
        .await
        .unwrap();

    assert_eq!(result, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // The registry sees the same breaker the service holds, still closed.
    let breaker = registry.get("payments").unwrap();
    assert_eq!(breaker.state(), CircuitState::Closed);
    assert_eq!(breaker.metrics().failure_count, 0);
}

#[tokio::test(start_paused = true)]
async fn hard_outage_trips_the_breaker_and_fails_fast() {
    let registry = CircuitBreakerRegistry::new();
    let service = ResilientService::register(
        &registry,
        "payments",
        CircuitBreakerConfig {
            failure_threshold: 2,
            success_threshold: 1,
            timeout: Duration::from_secs(60),
        },
        RetryConfig {
            max_attempts: 2,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            ..RetryConfig::default()
        },
    )
    .unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    // Dependency that never recovers within the retry budget.
    for _ in 0..2 {
        let err = service
            .execute_with_resilience(flaky_dependency(calls.clone(), u32::MAX))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Resilience(ResilienceError::RetryExhausted { .. })
        ));
    }

    assert_eq!(service.breaker().state(), CircuitState::Open);
    let invocations_while_tripping = calls.load(Ordering::SeqCst);

    let err = service
        .execute_with_resilience(flaky_dependency(calls.clone(), 0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Resilience(ResilienceError::CircuitOpen { .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), invocations_while_tripping);

    let snapshot = registry.all_metrics();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].total_rejections, 1);
}
