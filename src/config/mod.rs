//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load payroll configurations from YAML files,
//! including statutory rates, position quotas, and position schedule policies.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap().config();
//! println!("Tax rate: {}", config.payroll().statutory.tax_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    FallbackPolicy, GuardShifts, LeaveSettings, LoanSettings, OrganizationConfig, PayrollConfig,
    PayrollSettings, PositionsConfig, SchedulePolicy, ShiftAssignment, StatutoryRates,
};
