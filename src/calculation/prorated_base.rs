//! Salary proration by attendance.

use rust_decimal::Decimal;

/// Prorates a base monthly salary by days present.
///
/// The payable share is `base_salary * present_days / working_days`. A period
/// with no working days (an all-weekend range) prorates to zero rather than
/// dividing by zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_prorated_base;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let base = Decimal::from_str("2000000").unwrap();
/// assert_eq!(
///     calculate_prorated_base(base, 18, 20),
///     Decimal::from_str("1800000").unwrap()
/// );
/// ```
pub fn calculate_prorated_base(
    base_salary: Decimal,
    present_days: u32,
    working_days: u32,
) -> Decimal {
    if working_days == 0 {
        return Decimal::ZERO;
    }
    base_salary * Decimal::from(present_days) / Decimal::from(working_days)
}
