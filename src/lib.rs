//! Employee schedule, attendance and semi-monthly payroll engine.
//!
//! This crate derives monthly work schedules from position policies,
//! evaluates clock-in/out records against them, admits leave and loan
//! requests under weekly quotas and salary caps, and computes payroll for
//! the two pay periods of each month. An axum API exposes the engine over
//! HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod service;
pub mod store;
