//! Org-wide head-count caps per position.

use std::sync::Arc;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::store::PayrollStore;

/// Admission check for adding an employee to a position.
///
/// Positions without a configured quota are unlimited.
#[derive(Debug, Clone)]
pub struct PositionQuotaPolicy {
    config: Arc<PayrollConfig>,
}

impl PositionQuotaPolicy {
    /// Creates the policy over the given configuration.
    pub fn new(config: Arc<PayrollConfig>) -> Self {
        Self { config }
    }

    /// Checks whether one more employee fits in `position`.
    pub fn check(&self, position: &str, current_count: u32) -> EngineResult<()> {
        match self.config.position_quota(position) {
            Some(limit) if current_count >= limit => Err(EngineError::PositionQuotaExceeded {
                position: position.to_string(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// Counts the position's current holders and checks one more fits.
    pub fn evaluate<S: PayrollStore + ?Sized>(&self, store: &S, position: &str) -> EngineResult<()> {
        let count = store.count_in_position(position)?;
        self.check(position, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_config;

    #[test]
    fn test_position_below_quota_is_admitted() {
        let policy = PositionQuotaPolicy::new(test_config());
        assert!(policy.check("Manager", 2).is_ok());
    }

    #[test]
    fn test_full_position_is_rejected() {
        let policy = PositionQuotaPolicy::new(test_config());
        let error = policy.check("Manager", 3).unwrap_err();
        assert_eq!(error.to_string(), "Maximum for Manager is 3");
    }

    #[test]
    fn test_unlisted_position_is_unlimited() {
        let policy = PositionQuotaPolicy::new(test_config());
        assert!(policy.check("Janitor", 500).is_ok());
    }
}
