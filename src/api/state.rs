//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::PayrollConfig;
use crate::service::PayrollService;
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Holds the payroll service and the clock used for clock-in/out and
/// past-date checks.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService<InMemoryStore>>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates a state over an empty store and the system clock.
    pub fn new(config: Arc<PayrollConfig>) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a state over an empty store and the given clock.
    pub fn with_clock(config: Arc<PayrollConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            service: Arc::new(PayrollService::new(config, InMemoryStore::new())),
            clock,
        }
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService<InMemoryStore> {
        &self.service
    }

    /// Returns the clock.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }
}
