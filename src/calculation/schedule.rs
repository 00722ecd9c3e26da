//! Shift scheduling.
//!
//! This module derives an employee's expected monthly schedule from their
//! position. Positions are looked up in the configured policy table; guard
//! rotations pick one of three shifts by the suffix of the position name,
//! and unmapped positions use the fallback policy.

use chrono::{Datelike, Weekday};
use std::sync::Arc;
use tracing::debug;

use crate::config::{PayrollConfig, ShiftAssignment};
use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, Employee, Schedule, ScheduleDay, ScheduleEntry, ShiftDefinition};
use crate::store::PayrollStore;

/// One of the three rotating guard shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardSlot {
    /// Positions ending in "A".
    A,
    /// Positions ending in "B".
    B,
    /// Every other guard position.
    C,
}

impl GuardSlot {
    /// Picks the slot from the last character of a position name.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::calculation::GuardSlot;
    ///
    /// assert_eq!(GuardSlot::from_position("Security Guard A"), GuardSlot::A);
    /// assert_eq!(GuardSlot::from_position("Security Guard B"), GuardSlot::B);
    /// assert_eq!(GuardSlot::from_position("Security Guard"), GuardSlot::C);
    /// ```
    pub fn from_position(position: &str) -> Self {
        match position.trim_end().chars().last() {
            Some('A') => GuardSlot::A,
            Some('B') => GuardSlot::B,
            _ => GuardSlot::C,
        }
    }
}

/// The weekly pattern and shift that apply to one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSchedule {
    /// Days of the week worked.
    pub workdays: Vec<Weekday>,
    /// The shift worked on those days.
    pub shift: ShiftDefinition,
}

/// Derives monthly schedules from the position policy table.
#[derive(Debug, Clone)]
pub struct ShiftScheduler {
    config: Arc<PayrollConfig>,
}

impl ShiftScheduler {
    /// Creates a scheduler over the given configuration.
    pub fn new(config: Arc<PayrollConfig>) -> Self {
        Self { config }
    }

    /// Returns the configuration this scheduler reads.
    pub fn config(&self) -> &Arc<PayrollConfig> {
        &self.config
    }

    /// Resolves the schedule policy of a position.
    ///
    /// Lookup order: an exact policy entry, then a guard rotation whose
    /// position name prefixes this one (e.g. "Security Guard A"), then the
    /// fallback policy. Only the position name is consulted; the employee's
    /// department never affects the shift.
    pub fn resolve(&self, position: &str) -> PositionSchedule {
        let positions = self.config.positions();

        let policy = self.config.policy_for(position).or_else(|| {
            positions.policies.iter().find(|p| {
                p.shift == ShiftAssignment::GuardRotation && position.starts_with(&p.position)
            })
        });

        match policy {
            Some(policy) => {
                let shift = match &policy.shift {
                    ShiftAssignment::Fixed { shift } => shift.clone(),
                    ShiftAssignment::GuardRotation => {
                        let guards = &positions.guard_shifts;
                        match GuardSlot::from_position(position) {
                            GuardSlot::A => guards.a.clone(),
                            GuardSlot::B => guards.b.clone(),
                            GuardSlot::C => guards.c.clone(),
                        }
                    }
                };
                PositionSchedule {
                    workdays: policy.workdays.clone(),
                    shift,
                }
            }
            None => PositionSchedule {
                workdays: positions.fallback.workdays.clone(),
                shift: positions.fallback.shift.clone(),
            },
        }
    }

    /// Builds the schedule of an employee for one calendar month.
    ///
    /// This is a pure function of the position and the calendar; recorded
    /// attendance has no influence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonth` if `month`/`year` do not name a calendar month.
    pub fn schedule_for(&self, employee: &Employee, year: i32, month: u32) -> EngineResult<Schedule> {
        let range = DateRange::month(year, month)?;
        let policy = self.resolve(&employee.position);

        let entries: Vec<ScheduleEntry> = range
            .days()
            .map(|date| {
                let day = if policy.workdays.contains(&date.weekday()) {
                    ScheduleDay::WorkDay {
                        shift: policy.shift.clone(),
                    }
                } else {
                    ScheduleDay::RestDay
                };
                ScheduleEntry { date, day }
            })
            .collect();

        let total_workdays = entries.iter().filter(|e| e.day.is_workday()).count() as u32;

        Ok(Schedule {
            employee_id: employee.id.clone(),
            year,
            month,
            entries,
            total_workdays,
        })
    }

    /// Looks up an employee and builds their schedule.
    ///
    /// # Errors
    ///
    /// - `EmployeeNotFound` if the id is unknown
    /// - `InvalidMonth` if `month`/`year` do not name a calendar month
    pub fn schedule<S: PayrollStore + ?Sized>(
        &self,
        store: &S,
        employee_id: &str,
        month: u32,
        year: i32,
    ) -> EngineResult<Schedule> {
        let employee = store
            .employee(employee_id)?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })?;

        let schedule = self.schedule_for(&employee, year, month)?;
        debug!(
            employee_id = %employee.id,
            position = %employee.position,
            month,
            year,
            total_workdays = schedule.total_workdays,
            "Schedule generated"
        );
        Ok(schedule)
    }
}
