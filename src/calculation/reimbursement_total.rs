//! Approved-reimbursement summation.

use rust_decimal::Decimal;

use crate::models::{ReimbursementRecord, ReimbursementStatus};

/// Sums the approved claims in a set of reimbursement records.
///
/// Pending and rejected claims are excluded; only what an administrator has
/// approved is paid out.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::approved_total;
/// use rust_decimal::Decimal;
///
/// assert_eq!(approved_total(&[]), Decimal::ZERO);
/// ```
pub fn approved_total(records: &[ReimbursementRecord]) -> Decimal {
    records
        .iter()
        .filter(|r| r.status == ReimbursementStatus::Approved)
        .map(|r| r.amount)
        .sum()
}
