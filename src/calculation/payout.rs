//! Payout combination and currency rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;

/// The combined payable amounts for one employee in one period.
///
/// Every component is rounded with the same strategy before the total is
/// taken, so the total always equals the sum of the displayed components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Base salary prorated by presence, rounded to currency precision.
    pub prorated_base: Decimal,
    /// Overtime pay, rounded to currency precision.
    pub overtime_pay: Decimal,
    /// Approved reimbursement total, rounded to currency precision.
    pub reimbursement_total: Decimal,
    /// The total payable amount.
    pub total: Decimal,
}

/// Rounds an amount to currency precision, half-up.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let raw = Decimal::from_str("333333.335").unwrap();
/// assert_eq!(round_currency(raw, 2), Decimal::from_str("333333.34").unwrap());
/// ```
pub fn round_currency(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Combines the payout components, applying a single rounding mode throughout.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_payout;
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let payout = calculate_payout(
///     dec("1800000"),
///     dec("87500"),
///     dec("150000"),
///     &PayrollConfig::default(),
/// );
/// assert_eq!(payout.total, dec("2037500.00"));
/// ```
pub fn calculate_payout(
    prorated_base: Decimal,
    overtime_pay: Decimal,
    reimbursement_total: Decimal,
    config: &PayrollConfig,
) -> Payout {
    let scale = config.rounding.currency_scale;
    let prorated_base = round_currency(prorated_base, scale);
    let overtime_pay = round_currency(overtime_pay, scale);
    let reimbursement_total = round_currency(reimbursement_total, scale);

    Payout {
        prorated_base,
        overtime_pay,
        reimbursement_total,
        total: prorated_base + overtime_pay + reimbursement_total,
    }
}
