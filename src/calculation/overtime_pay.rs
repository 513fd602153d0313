//! Overtime pay derivation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;

/// The result of pricing an employee's overtime hours for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePay {
    /// Total overtime hours claimed across the period.
    pub total_hours: Decimal,
    /// The hourly rate derived from the employee's base salary.
    pub hourly_rate: Decimal,
    /// The payable amount (`total_hours * hourly_rate`).
    pub amount: Decimal,
}

/// Prices the total overtime hours for an employee.
///
/// The hourly rate comes from the configuration
/// ([`PayrollConfig::hourly_overtime_rate`]), not a hardcoded literal.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_overtime_pay;
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let mut config = PayrollConfig::default();
/// config.overtime.standard_monthly_hours = Decimal::from_str("160").unwrap();
/// config.overtime.multiplier = Decimal::from_str("2").unwrap();
///
/// // 2,000,000 / 160 * 2 = 25,000 per hour; 3.5 hours pay 87,500.
/// let pay = calculate_overtime_pay(
///     Decimal::from_str("2000000").unwrap(),
///     Decimal::from_str("3.5").unwrap(),
///     &config,
/// );
/// assert_eq!(pay.hourly_rate, Decimal::from_str("25000").unwrap());
/// assert_eq!(pay.amount, Decimal::from_str("87500").unwrap());
/// ```
pub fn calculate_overtime_pay(
    base_salary: Decimal,
    total_hours: Decimal,
    config: &PayrollConfig,
) -> OvertimePay {
    let hourly_rate = config.hourly_overtime_rate(base_salary);
    OvertimePay {
        total_hours,
        hourly_rate,
        amount: total_hours * hourly_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OvertimeRateConfig, RoundingConfig};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn config(standard_monthly_hours: &str, multiplier: &str) -> PayrollConfig {
        PayrollConfig {
            overtime: OvertimeRateConfig {
                standard_monthly_hours: dec(standard_monthly_hours),
                multiplier: dec(multiplier),
            },
            rounding: RoundingConfig { currency_scale: 2 },
        }
    }

    #[test]
    fn test_three_and_a_half_hours_at_25000() {
        let pay = calculate_overtime_pay(dec("2000000"), dec("3.5"), &config("160", "2"));
        assert_eq!(pay.hourly_rate, dec("25000"));
        assert_eq!(pay.amount, dec("87500"));
    }

    #[test]
    fn test_zero_hours_pay_nothing() {
        let pay = calculate_overtime_pay(dec("2000000"), dec("0"), &config("160", "2"));
        assert_eq!(pay.amount, dec("0"));
    }

    #[test]
    fn test_multiplier_scales_rate() {
        let single = calculate_overtime_pay(dec("2000000"), dec("2"), &config("160", "1"));
        let double = calculate_overtime_pay(dec("2000000"), dec("2"), &config("160", "2"));
        assert_eq!(double.amount, single.amount * dec("2"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let pay = calculate_overtime_pay(dec("2000000"), dec("1.5"), &config("160", "2"));
        let json = serde_json::to_string(&pay).unwrap();
        let deserialized: OvertimePay = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, pay);
        assert_eq!(deserialized.amount, dec("37500"));
    }
}
