//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{EngineError, EngineResult};

use super::types::{OrganizationConfig, PayrollConfig, PayrollSettings, PositionsConfig};

/// Highest cutoff day that leaves a non-empty second period in every month.
const MAX_CUTOFF_DAY: u32 = 27;

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates the values the calculators divide by, and hands out a shared
/// immutable [`PayrollConfig`].
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── organization.yaml # Organization name and database identifier
/// ├── payroll.yaml      # Statutory rates, divisors, loan and leave settings
/// └── positions.yaml    # Head-count quotas and schedule policies
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Loaded configuration for {}", loader.config().organization().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Arc<PayrollConfig>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or out-of-range values (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let organization =
            Self::load_yaml::<OrganizationConfig>(&path.join("organization.yaml"))?;

        let payroll_path = path.join("payroll.yaml");
        let payroll = Self::load_yaml::<PayrollSettings>(&payroll_path)?;
        Self::validate_payroll(&payroll, &payroll_path)?;

        let positions = Self::load_yaml::<PositionsConfig>(&path.join("positions.yaml"))?;

        let config = PayrollConfig::new(organization, payroll, positions);
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Rejects settings the payroll calculation cannot work with.
    fn validate_payroll(settings: &PayrollSettings, path: &Path) -> EngineResult<()> {
        let invalid = |message: String| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        if settings.working_days_per_month <= Decimal::ZERO {
            return Err(invalid(
                "working_days_per_month must be greater than zero".to_string(),
            ));
        }
        if settings.standard_paid_hours <= Decimal::ZERO {
            return Err(invalid(
                "standard_paid_hours must be greater than zero".to_string(),
            ));
        }
        if settings.overtime_multiplier <= Decimal::ONE {
            return Err(invalid(format!(
                "overtime_multiplier must be greater than 1.0, got {}",
                settings.overtime_multiplier
            )));
        }
        if !(1..=MAX_CUTOFF_DAY).contains(&settings.period_cutoff_day) {
            return Err(invalid(format!(
                "period_cutoff_day must be between 1 and {}, got {}",
                MAX_CUTOFF_DAY, settings.period_cutoff_day
            )));
        }
        if settings.loans.installment_per_period < Decimal::ZERO {
            return Err(invalid(
                "loans.installment_per_period must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the shared configuration.
    pub fn config(&self) -> Arc<PayrollConfig> {
        Arc::clone(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShiftAssignment;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().config();
        assert_eq!(config.organization().database, "employee_management.db");
    }

    #[test]
    fn test_statutory_rates_loaded_correctly() {
        let config = ConfigLoader::load(config_path()).unwrap().config();
        let statutory = &config.payroll().statutory;

        assert_eq!(statutory.sss_rate, dec("0.045"));
        assert_eq!(statutory.pagibig_rate, dec("0.02"));
        assert_eq!(statutory.philhealth_rate, dec("0.02"));
        assert_eq!(statutory.tax_rate, dec("0.10"));
        assert_eq!(config.payroll().standard_paid_hours, dec("8"));
    }

    #[test]
    fn test_position_quotas_loaded_correctly() {
        let config = ConfigLoader::load(config_path()).unwrap().config();

        assert_eq!(config.position_quota("Manager"), Some(3));
        assert_eq!(config.position_quota("Sales"), Some(6));
        assert_eq!(config.position_quota("Production Worker A"), Some(5));
        assert_eq!(config.position_quota("Security Guard"), Some(3));
        assert_eq!(config.position_quota("Janitor"), None);
    }

    #[test]
    fn test_security_guard_uses_rotation() {
        let config = ConfigLoader::load(config_path()).unwrap().config();

        let policy = config.policy_for("Security Guard").unwrap();
        assert_eq!(policy.shift, ShiftAssignment::GuardRotation);
        assert!(config.positions().guard_shifts.c.is_overnight());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("organization.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_multiplier_is_rejected() {
        let mut settings: PayrollSettings = serde_yaml::from_str(
            &fs::read_to_string(Path::new(config_path()).join("payroll.yaml")).unwrap(),
        )
        .unwrap();
        settings.overtime_multiplier = dec("0.9");

        let result = ConfigLoader::validate_payroll(&settings, Path::new("payroll.yaml"));
        match result {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("overtime_multiplier"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_cutoff_day_out_of_range_is_rejected() {
        let mut settings: PayrollSettings = serde_yaml::from_str(
            &fs::read_to_string(Path::new(config_path()).join("payroll.yaml")).unwrap(),
        )
        .unwrap();
        settings.period_cutoff_day = 30;

        assert!(ConfigLoader::validate_payroll(&settings, Path::new("payroll.yaml")).is_err());
    }
}
