//! Resilience infrastructure for calls to failure-prone collaborators
//!
//! Three building blocks compose here: [`RetryPolicy`] absorbs transient
//! failures with exponential backoff, [`CircuitBreaker`] fails fast when a
//! dependency stays down, and [`ResilientService`] combines both with the
//! retries running inside the breaker. Breakers are looked up by name
//! through a [`CircuitBreakerRegistry`] owned by the application.

mod circuit_breaker;
mod registry;
mod resilient;
mod retry;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState,
};
pub use registry::CircuitBreakerRegistry;
pub use resilient::ResilientService;
pub use retry::{RetryConfig, RetryPolicy};
