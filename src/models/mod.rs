//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod overtime;
mod payroll_result;
mod period;
mod reimbursement;

pub use attendance::AttendanceRecord;
pub use employee::{Employee, NewEmployee, Role};
pub use overtime::{MAX_DAILY_OVERTIME_HOURS, OvertimeRecord};
pub use payroll_result::PayrollResult;
pub use period::AttendancePeriod;
pub use reimbursement::{ReimbursementRecord, ReimbursementStatus};
