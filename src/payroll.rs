//! Payroll computation engine.
//!
//! Computes every active employee's payout for a period and closes the
//! period, all inside one store transaction. The period is claimed first with
//! a compare-and-set on its `payroll_processed` flag, so of any number of
//! concurrent runs exactly one computes and commits; the rest observe
//! `AlreadyProcessed` and no partial state ever becomes visible.

use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior, params};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::calculation::{
    approved_total, calculate_overtime_pay, calculate_payout, calculate_prorated_base,
    count_working_days,
};
use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::ledger::{overtime, reimbursement};
use crate::models::PayrollResult;
use crate::store::{self, Store};
use crate::{directory, registry};

/// Computes payroll for a period and marks it processed, exactly once.
///
/// For each active employee with a base salary this counts present days,
/// prices claimed overtime at the configured rate, sums approved
/// reimbursements, and persists one [`PayrollResult`]. The result set and the
/// period's processed flag commit in a single atomic unit: a failure partway
/// leaves the period unprocessed with no results, so the call is safely
/// retryable. Employees without a base salary are skipped; a period with no
/// payable employees still closes, with zero results.
///
/// # Errors
///
/// * `PeriodNotFound` — unknown period id.
/// * `AlreadyProcessed` — the period was already closed (by an earlier run or
///   a concurrent winner). Nothing is recomputed.
/// * `Storage` — the store failed; the all-or-nothing commit guarantees no
///   partial results were kept.
pub fn compute_and_close(
    store: &Store,
    period_id: Uuid,
    config: &PayrollConfig,
    actor: Uuid,
) -> EngineResult<Vec<PayrollResult>> {
    let mut conn = store.lock()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let computed_at = Utc::now();
    registry::claim_for_processing_tx(&tx, period_id, actor, computed_at)?;
    let period = registry::get_tx(&tx, period_id)?;
    let working_days = count_working_days(period.start_date, period.end_date);

    let mut results = Vec::new();
    for employee in directory::list_active_tx(&tx)? {
        let Some(base_salary) = employee.base_salary else {
            continue;
        };

        let present_days = count_present_days_tx(&tx, employee.id, period_id)?;
        let overtime_hours: Decimal =
            overtime::list_by_employee_and_period_tx(&tx, employee.id, period_id)?
                .iter()
                .map(|record| record.hours_worked)
                .sum();
        let claims = reimbursement::list_by_employee_and_period_tx(&tx, employee.id, period_id)?;

        let prorated = calculate_prorated_base(base_salary, present_days, working_days);
        let overtime_pay = calculate_overtime_pay(base_salary, overtime_hours, config);
        let payout = calculate_payout(prorated, overtime_pay.amount, approved_total(&claims), config);

        let result = PayrollResult {
            id: Uuid::new_v4(),
            employee_id: employee.id,
            period_id,
            present_days,
            working_days,
            prorated_base: payout.prorated_base,
            overtime_pay: payout.overtime_pay,
            reimbursement_total: payout.reimbursement_total,
            total_pay: payout.total,
            computed_at,
        };
        insert_result_tx(&tx, &result)?;
        results.push(result);
    }

    tx.commit()?;

    info!(
        period_id = %period_id,
        employees_paid = results.len(),
        working_days,
        "computed payroll and closed period"
    );
    Ok(results)
}

/// Lists the persisted payroll results for a period, ordered by employee.
///
/// Empty until the period has been processed.
pub fn list_results(store: &Store, period_id: Uuid) -> EngineResult<Vec<PayrollResult>> {
    let conn = store.lock()?;
    let mut stmt = conn.prepare(
        "SELECT id, employee_id, period_id, present_days, working_days, prorated_base,
                overtime_pay, reimbursement_total, total_pay, computed_at
         FROM payroll_results WHERE period_id = ?1 ORDER BY employee_id",
    )?;
    let results = stmt
        .query_map(params![period_id.to_string()], map_result)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(results)
}

fn count_present_days_tx(conn: &Connection, employee_id: Uuid, period_id: Uuid) -> EngineResult<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM attendances
         WHERE employee_id = ?1 AND period_id = ?2 AND is_present = 1",
        params![employee_id.to_string(), period_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn insert_result_tx(conn: &Connection, result: &PayrollResult) -> EngineResult<()> {
    conn.execute(
        "INSERT INTO payroll_results (id, employee_id, period_id, present_days, working_days,
                                      prorated_base, overtime_pay, reimbursement_total,
                                      total_pay, computed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            result.id.to_string(),
            result.employee_id.to_string(),
            result.period_id.to_string(),
            result.present_days,
            result.working_days,
            result.prorated_base.to_string(),
            result.overtime_pay.to_string(),
            result.reimbursement_total.to_string(),
            result.total_pay.to_string(),
            result.computed_at,
        ],
    )?;
    Ok(())
}

fn map_result(row: &rusqlite::Row<'_>) -> rusqlite::Result<PayrollResult> {
    let id: String = row.get(0)?;
    let employee_id: String = row.get(1)?;
    let period_id: String = row.get(2)?;
    let prorated_base: String = row.get(5)?;
    let overtime_pay: String = row.get(6)?;
    let reimbursement_total: String = row.get(7)?;
    let total_pay: String = row.get(8)?;

    Ok(PayrollResult {
        id: store::column_uuid(&id, 0)?,
        employee_id: store::column_uuid(&employee_id, 1)?,
        period_id: store::column_uuid(&period_id, 2)?,
        present_days: row.get(3)?,
        working_days: row.get(4)?,
        prorated_base: store::column_decimal(&prorated_base, 5)?,
        overtime_pay: store::column_decimal(&overtime_pay, 6)?,
        reimbursement_total: store::column_decimal(&reimbursement_total, 7)?,
        total_pay: store::column_decimal(&total_pay, 8)?,
        computed_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OvertimeRateConfig, RoundingConfig};
    use crate::error::EngineError;
    use crate::ledger::{attendance, overtime, reimbursement};
    use crate::ledger::reimbursement::ReviewDecision;
    use crate::models::{NewEmployee, Role};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// 160 standard hours and a 2x multiplier: a 2,000,000 salary prices
    /// overtime at 25,000 per hour.
    fn test_config() -> PayrollConfig {
        PayrollConfig {
            overtime: OvertimeRateConfig {
                standard_monthly_hours: dec("160"),
                multiplier: dec("2"),
            },
            rounding: RoundingConfig { currency_scale: 2 },
        }
    }

    struct Fixture {
        store: Store,
        admin: Uuid,
        period: Uuid,
    }

    fn setup() -> Fixture {
        let store = Store::open_in_memory().unwrap();
        let admin = Uuid::new_v4();
        // Four full Monday-to-Friday weeks: 20 working days.
        let period = registry::create(
            &store,
            "June 2025",
            date(2025, 6, 2),
            date(2025, 6, 27),
            admin,
        )
        .unwrap()
        .id;
        Fixture {
            store,
            admin,
            period,
        }
    }

    fn add_employee(f: &Fixture, username: &str, salary: Option<&str>) -> Uuid {
        directory::create(
            &f.store,
            NewEmployee {
                username: username.to_string(),
                password_hash: "$2b$14$hash".to_string(),
                role: Role::Employee,
                base_salary: salary.map(dec),
            },
            f.admin,
        )
        .unwrap()
        .id
    }

    /// Submits attendance for the first `days` working days of June 2025.
    fn attend_working_days(f: &Fixture, employee: Uuid, days: usize) {
        let worked: Vec<NaiveDate> =
            crate::calculation::working_dates(date(2025, 6, 2), date(2025, 6, 27))
                .take(days)
                .collect();
        assert_eq!(worked.len(), days);
        for day in worked {
            attendance::submit(&f.store, employee, f.period, day, None).unwrap();
        }
    }

    #[test]
    fn test_prorated_base_for_18_of_20_days() {
        let f = setup();
        let employee = add_employee(&f, "budi", Some("2000000"));
        attend_working_days(&f, employee, 18);

        let results = compute_and_close(&f.store, f.period, &test_config(), f.admin).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].present_days, 18);
        assert_eq!(results[0].working_days, 20);
        assert_eq!(results[0].prorated_base, dec("1800000"));
        assert_eq!(results[0].total_pay, dec("1800000"));
    }

    #[test]
    fn test_overtime_priced_at_configured_rate() {
        let f = setup();
        let employee = add_employee(&f, "budi", Some("2000000"));
        overtime::submit(
            &f.store,
            employee,
            f.period,
            date(2025, 6, 3),
            dec("2"),
            "",
            None,
        )
        .unwrap();
        overtime::submit(
            &f.store,
            employee,
            f.period,
            date(2025, 6, 4),
            dec("1.5"),
            "",
            None,
        )
        .unwrap();

        let results = compute_and_close(&f.store, f.period, &test_config(), f.admin).unwrap();
        assert_eq!(results[0].overtime_pay, dec("87500"));
    }

    #[test]
    fn test_only_approved_reimbursements_paid() {
        let f = setup();
        let employee = add_employee(&f, "budi", Some("2000000"));
        let approved = reimbursement::submit(
            &f.store, employee, f.period, dec("150000"), "taxi", None, None,
        )
        .unwrap();
        reimbursement::submit(
            &f.store, employee, f.period, dec("999999"), "pending claim", None, None,
        )
        .unwrap();
        let rejected = reimbursement::submit(
            &f.store, employee, f.period, dec("888888"), "rejected claim", None, None,
        )
        .unwrap();
        reimbursement::review(&f.store, approved.id, ReviewDecision::Approve, f.admin).unwrap();
        reimbursement::review(&f.store, rejected.id, ReviewDecision::Reject, f.admin).unwrap();

        let results = compute_and_close(&f.store, f.period, &test_config(), f.admin).unwrap();
        assert_eq!(results[0].reimbursement_total, dec("150000"));
    }

    #[test]
    fn test_total_combines_all_components() {
        let f = setup();
        let employee = add_employee(&f, "budi", Some("2000000"));
        attend_working_days(&f, employee, 18);
        overtime::submit(
            &f.store,
            employee,
            f.period,
            date(2025, 6, 3),
            dec("2"),
            "",
            None,
        )
        .unwrap();
        overtime::submit(
            &f.store,
            employee,
            f.period,
            date(2025, 6, 4),
            dec("1.5"),
            "",
            None,
        )
        .unwrap();
        let claim = reimbursement::submit(
            &f.store, employee, f.period, dec("150000"), "taxi", None, None,
        )
        .unwrap();
        reimbursement::review(&f.store, claim.id, ReviewDecision::Approve, f.admin).unwrap();

        let results = compute_and_close(&f.store, f.period, &test_config(), f.admin).unwrap();
        // 1,800,000 + 87,500 + 150,000
        assert_eq!(results[0].total_pay, dec("2037500"));
    }

    #[test]
    fn test_second_run_fails_and_results_unchanged() {
        let f = setup();
        let employee = add_employee(&f, "budi", Some("2000000"));
        attend_working_days(&f, employee, 10);

        let first = compute_and_close(&f.store, f.period, &test_config(), f.admin).unwrap();
        let second = compute_and_close(&f.store, f.period, &test_config(), f.admin);
        assert!(matches!(second, Err(EngineError::AlreadyProcessed { .. })));

        let persisted = list_results(&f.store, f.period).unwrap();
        assert_eq!(persisted, first);
    }

    #[test]
    fn test_unknown_period_fails() {
        let f = setup();
        let result = compute_and_close(&f.store, Uuid::new_v4(), &test_config(), f.admin);
        assert!(matches!(result, Err(EngineError::PeriodNotFound { .. })));
    }

    #[test]
    fn test_no_employees_still_closes_period() {
        let f = setup();
        let results = compute_and_close(&f.store, f.period, &test_config(), f.admin).unwrap();
        assert!(results.is_empty());
        assert!(registry::get(&f.store, f.period).unwrap().processed);
    }

    #[test]
    fn test_employee_without_salary_skipped() {
        let f = setup();
        let paid = add_employee(&f, "budi", Some("2000000"));
        let unpaid = add_employee(&f, "intern", None);
        attend_working_days(&f, paid, 5);
        attendance::submit(&f.store, unpaid, f.period, date(2025, 6, 3), None).unwrap();

        let results = compute_and_close(&f.store, f.period, &test_config(), f.admin).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].employee_id, paid);
    }

    #[test]
    fn test_inactive_employee_not_paid() {
        let f = setup();
        let active = add_employee(&f, "budi", Some("2000000"));
        let inactive = add_employee(&f, "gone", Some("3000000"));
        attend_working_days(&f, active, 5);
        directory::deactivate(&f.store, inactive, f.admin).unwrap();

        let results = compute_and_close(&f.store, f.period, &test_config(), f.admin).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].employee_id, active);
    }

    #[test]
    fn test_results_empty_before_processing() {
        let f = setup();
        add_employee(&f, "budi", Some("2000000"));
        assert!(list_results(&f.store, f.period).unwrap().is_empty());
    }
}
