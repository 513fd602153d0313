//! Calculation logic for payroll computation.
//!
//! This module contains the pure arithmetic behind a payout: working-day
//! counting, salary proration by presence, overtime pay derivation from the
//! configured rate, approved-reimbursement summation, and the final payout
//! combination with currency rounding. Everything here is side-effect free;
//! reading ledgers and committing results is the engine's job.

mod overtime_pay;
mod payout;
mod prorated_base;
mod reimbursement_total;
mod working_days;

pub use overtime_pay::{OvertimePay, calculate_overtime_pay};
pub use payout::{Payout, calculate_payout, round_currency};
pub use prorated_base::calculate_prorated_base;
pub use reimbursement_total::approved_total;
pub use working_days::{count_working_days, is_weekend, working_dates};
