//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Parameters deriving an employee's hourly overtime rate from their salary.
#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeRateConfig {
    /// Divisor turning a monthly salary into an hourly base rate
    /// (e.g., 173.33 for a 40-hour week).
    pub standard_monthly_hours: Decimal,
    /// Premium multiplier applied to the hourly base rate.
    pub multiplier: Decimal,
}

/// Rounding policy for payable amounts.
#[derive(Debug, Clone, Deserialize)]
pub struct RoundingConfig {
    /// Decimal places for currency values.
    pub currency_scale: u32,
}

/// The complete payroll configuration.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = PayrollConfig::default();
/// let rate = config.hourly_overtime_rate(Decimal::from_str("1733300").unwrap());
/// assert_eq!(rate, Decimal::from_str("20000").unwrap());
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Overtime rate derivation parameters.
    pub overtime: OvertimeRateConfig,
    /// Currency rounding policy.
    pub rounding: RoundingConfig,
}

impl PayrollConfig {
    /// Derives the hourly overtime rate for a base monthly salary.
    ///
    /// The rate is `base_salary / standard_monthly_hours * multiplier`.
    pub fn hourly_overtime_rate(&self, base_salary: Decimal) -> Decimal {
        base_salary / self.overtime.standard_monthly_hours * self.overtime.multiplier
    }
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            overtime: OvertimeRateConfig {
                // 40 hours/week * 52 weeks / 12 months
                standard_monthly_hours: Decimal::new(17333, 2),
                multiplier: Decimal::TWO,
            },
            rounding: RoundingConfig { currency_scale: 2 },
        }
    }
}
