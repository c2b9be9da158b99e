//! Named circuit breaker registry
//!
//! The registry is an explicitly constructed component: the application
//! builds one and hands it to whoever needs breakers. Tests get their own
//! isolated instance instead of sharing hidden global state.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::{DomainResult, ResilienceError};

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics};

/// Registry of circuit breakers keyed by dependency name
#[derive(Default)]
pub struct CircuitBreakerRegistry {
    breakers: RwLock<HashMap<String, Arc<CircuitBreaker>>>,
}

impl CircuitBreakerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a breaker under a name, returning the shared handle.
    ///
    /// Fails with `ResilienceError::DuplicateBreaker` when the name is
    /// already taken; re-registering would silently discard the existing
    /// breaker's state.
    pub fn register(
        &self,
        name: &str,
        config: CircuitBreakerConfig,
    ) -> DomainResult<Arc<CircuitBreaker>> {
        let mut breakers = self.write();

        if breakers.contains_key(name) {
            return Err(ResilienceError::DuplicateBreaker {
                name: name.to_string(),
            }
            .into());
        }

        let breaker = Arc::new(CircuitBreaker::with_config(name, config));
        breakers.insert(name.to_string(), breaker.clone());
        tracing::debug!(circuit_breaker = %name, "Circuit breaker registered");

        Ok(breaker)
    }

    /// Looks up a breaker by name.
    pub fn get(&self, name: &str) -> DomainResult<Arc<CircuitBreaker>> {
        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| {
                ResilienceError::BreakerNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Names of all registered breakers.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Removes a breaker, returning whether it existed.
    pub fn remove(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    /// Metrics snapshots for every registered breaker.
    pub fn all_metrics(&self) -> Vec<CircuitBreakerMetrics> {
        self.read().values().map(|b| b.metrics()).collect()
    }

    /// Removes every breaker. Intended for test isolation.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<CircuitBreaker>>> {
        self.breakers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<CircuitBreaker>>> {
        self.breakers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
