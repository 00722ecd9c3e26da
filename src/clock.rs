//! Wall-clock access.
//!
//! Clock-in/out and past-date rules depend on "now". Components take the
//! current time from a [`Clock`] so tests can pin it.

use chrono::{Local, NaiveDateTime};
use std::fmt::Debug;

/// A source of the current local date and time.
pub trait Clock: Send + Sync + Debug {
    /// The current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at a fixed instant.
///
/// # Example
///
/// ```
/// use payroll_engine::clock::{Clock, FixedClock};
/// use chrono::NaiveDate;
///
/// let instant = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// assert_eq!(FixedClock(instant).now(), instant);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
