//! Circuit breaker guarding calls to failure-prone collaborators
//!
//! # State machine
//!
//! ```text
//! ┌─────────┐
//! │ CLOSED  │ ◄──────────────────┐
//! │ (normal)│                    │
//! └────┬────┘                    │
//!      │ failure_threshold       │ success_threshold
//!      │ consecutive failures    │ consecutive successes
//!      ▼                         │
//! ┌─────────┐    timeout    ┌────┴──────┐
//! │  OPEN   │───────────────► HALF_OPEN │
//! │(failing)│                │ (probing) │
//! └─────────┘◄───────────────└───────────┘
//!                any failure
//! ```
//!
//! While OPEN, calls fail fast with `ResilienceError::CircuitOpen`. Once the
//! timeout elapses the next call itself is the probe: it flips the breaker
//! to HALF_OPEN and runs.

use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{DomainResult, ResilienceError};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    /// Normal operation, all calls pass through
    Closed,
    /// Failing fast, calls rejected until the timeout elapses
    Open,
    /// Probing recovery with live calls
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "CLOSED"),
            CircuitState::Open => write!(f, "OPEN"),
            CircuitState::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures in CLOSED before the breaker trips
    pub failure_threshold: u32,
    /// Consecutive successes in HALF_OPEN before the breaker closes
    pub success_threshold: u32,
    /// How long the breaker stays OPEN before admitting a probe
    pub timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Point-in-time snapshot of a breaker, for observability endpoints
#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerMetrics {
    pub name: String,
    pub state: CircuitState,
    pub failure_count: u32,
    pub success_count: u32,
    pub total_requests: u64,
    pub total_failures: u64,
    pub total_rejections: u64,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub next_attempt_at: Option<DateTime<Utc>>,
}

/// Mutable breaker bookkeeping, guarded by one mutex so transitions are
/// observed atomically by concurrent callers.
#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    total_requests: u64,
    total_failures: u64,
    total_rejections: u64,
    last_failure_at: Option<DateTime<Utc>>,
    last_success_at: Option<DateTime<Utc>>,
    next_attempt_at: Option<DateTime<Utc>>,
}

impl BreakerState {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            total_requests: 0,
            total_failures: 0,
            total_rejections: 0,
            last_failure_at: None,
            last_success_at: None,
            next_attempt_at: None,
        }
    }
}

/// Circuit breaker for a single named downstream dependency
///
/// The lock is only held for bookkeeping, never across the awaited
/// operation, so slow calls do not serialize behind each other.
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    /// Creates a circuit breaker with default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CircuitBreakerConfig::default())
    }

    /// Creates a circuit breaker with explicit configuration.
    pub fn with_config(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerState::new()),
        }
    }

    /// Breaker name, as registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Point-in-time metrics snapshot.
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        let inner = self.lock();
        CircuitBreakerMetrics {
            name: self.name.clone(),
            state: inner.state,
            failure_count: inner.failure_count,
            success_count: inner.success_count,
            total_requests: inner.total_requests,
            total_failures: inner.total_failures,
            total_rejections: inner.total_rejections,
            last_failure_at: inner.last_failure_at,
            last_success_at: inner.last_success_at,
            next_attempt_at: inner.next_attempt_at,
        }
    }

    /// Executes an operation through the breaker.
    ///
    /// In OPEN state the call fails fast with
    /// `ResilienceError::CircuitOpen` until the timeout elapses; the first
    /// call after that becomes the HALF_OPEN probe. The operation's own
    /// error is returned unchanged after bookkeeping.
    pub async fn execute<F, T>(&self, operation: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        self.admit()?;

        match operation.await {
            Ok(value) => {
                self.on_success();
                Ok(value)
            }
            Err(err) => {
                self.on_failure();
                Err(err)
            }
        }
    }

    /// Forces the breaker OPEN, as if it had just tripped.
    pub fn force_open(&self) {
        let mut inner = self.lock();
        Self::trip(&mut inner, &self.name, &self.config);
        tracing::warn!(circuit_breaker = %self.name, "Circuit breaker forced open");
    }

    /// Forces the breaker CLOSED and clears its counters.
    pub fn force_close(&self) {
        let mut inner = self.lock();
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.success_count = 0;
        inner.next_attempt_at = None;
        tracing::info!(circuit_breaker = %self.name, "Circuit breaker forced closed");
    }

    /// Admission check running the OPEN → HALF_OPEN transition.
    fn admit(&self) -> DomainResult<()> {
        let mut inner = self.lock();

        if inner.state == CircuitState::Open {
            let ready = inner
                .next_attempt_at
                .map(|at| Utc::now() >= at)
                .unwrap_or(true);

            if !ready {
                inner.total_rejections += 1;
                return Err(ResilienceError::CircuitOpen {
                    name: self.name.clone(),
                }
                .into());
            }

            inner.state = CircuitState::HalfOpen;
            inner.success_count = 0;
            tracing::info!(
                circuit_breaker = %self.name,
                transition = "OPEN -> HALF_OPEN",
                "Circuit breaker admitting probe call"
            );
        }

        inner.total_requests += 1;
        Ok(())
    }

    fn on_success(&self) {
        let mut inner = self.lock();
        inner.last_success_at = Some(Utc::now());

        match inner.state {
            CircuitState::Closed => {
                inner.failure_count = 0;
            }
            CircuitState::HalfOpen => {
                inner.success_count += 1;
                if inner.success_count >= self.config.success_threshold {
                    inner.state = CircuitState::Closed;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                    inner.next_attempt_at = None;
                    tracing::info!(
                        circuit_breaker = %self.name,
                        transition = "HALF_OPEN -> CLOSED",
                        "Circuit breaker closed after recovery"
                    );
                }
            }
            CircuitState::Open => {}
        }
    }

    fn on_failure(&self) {
        let mut inner = self.lock();
        inner.total_failures += 1;
        inner.last_failure_at = Some(Utc::now());

        match inner.state {
            CircuitState::Closed => {
                inner.failure_count += 1;
                if inner.failure_count >= self.config.failure_threshold {
                    Self::trip(&mut inner, &self.name, &self.config);
                }
            }
            CircuitState::HalfOpen => {
                Self::trip(&mut inner, &self.name, &self.config);
            }
            CircuitState::Open => {}
        }
    }

    fn trip(inner: &mut BreakerState, name: &str, config: &CircuitBreakerConfig) {
        inner.state = CircuitState::Open;
        inner.success_count = 0;
        inner.next_attempt_at =
            Some(Utc::now() + chrono::Duration::milliseconds(config.timeout.as_millis() as i64));
        tracing::warn!(
            circuit_breaker = %name,
            transition = "-> OPEN",
            failure_count = inner.failure_count,
            "Circuit breaker tripped"
        );
    }

    /// A poisoned lock only means a caller panicked mid-bookkeeping; the
    /// counters remain usable, so recover the guard rather than propagate.
    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &inner.state)
            .field("failure_count", &inner.failure_count)
            .field("success_count", &inner.success_count)
            .field("config", &self.config)
            .finish()
    }
}
