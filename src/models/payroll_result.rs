//! Payroll result model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One employee's computed payout for one processed period.
///
/// Exactly one result exists per (employee, period); the durable store
/// enforces the uniqueness and the whole result set for a period commits
/// atomically with the period's processed flag.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollResult;
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
/// use uuid::Uuid;
///
/// let result = PayrollResult {
///     id: Uuid::new_v4(),
///     employee_id: Uuid::new_v4(),
///     period_id: Uuid::new_v4(),
///     present_days: 18,
///     working_days: 20,
///     prorated_base: Decimal::from_str("1800000").unwrap(),
///     overtime_pay: Decimal::from_str("87500").unwrap(),
///     reimbursement_total: Decimal::from_str("150000").unwrap(),
///     total_pay: Decimal::from_str("2037500").unwrap(),
///     computed_at: Utc::now(),
/// };
/// assert_eq!(
///     result.total_pay,
///     result.prorated_base + result.overtime_pay + result.reimbursement_total
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Unique identifier for the result.
    pub id: Uuid,
    /// The employee being paid.
    pub employee_id: Uuid,
    /// The period the payout covers.
    pub period_id: Uuid,
    /// Days the employee was present during the period.
    pub present_days: u32,
    /// Non-weekend days in the period's date range.
    pub working_days: u32,
    /// Base salary prorated by presence.
    pub prorated_base: Decimal,
    /// Pay for claimed overtime hours.
    pub overtime_pay: Decimal,
    /// Sum of approved reimbursement claims.
    pub reimbursement_total: Decimal,
    /// Total payable amount, rounded to currency precision.
    pub total_pay: Decimal,
    /// When the payout was computed.
    pub computed_at: DateTime<Utc>,
}
