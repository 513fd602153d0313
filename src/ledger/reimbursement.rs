//! Reimbursement ledger.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{ReimbursementRecord, ReimbursementStatus};
use crate::store::{self, Store};
use crate::{directory, registry};

const REIMBURSEMENT_COLUMNS: &str = "id, employee_id, period_id, amount, description,
                                     receipt_reference, status, ip_address, created_at,
                                     updated_at, created_by, updated_by";

/// The outcome of reviewing a pending reimbursement claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Approve the claim; it will be included in payroll.
    Approve,
    /// Reject the claim; it will never be paid.
    Reject,
}

impl ReviewDecision {
    fn status(self) -> ReimbursementStatus {
        match self {
            ReviewDecision::Approve => ReimbursementStatus::Approved,
            ReviewDecision::Reject => ReimbursementStatus::Rejected,
        }
    }
}

/// Submits a new expense claim against a period.
///
/// Every call inserts an independent claim with `Pending` status; there is no
/// per-day uniqueness and no upsert.
///
/// # Errors
///
/// * `Unauthorized` — the employee is inactive.
/// * `EmployeeNotFound` / `PeriodNotFound` — unknown references.
/// * `AlreadyProcessed` — the period has been closed by payroll.
/// * `Validation` — `amount` is not positive or `description` is empty.
pub fn submit(
    store: &Store,
    employee_id: Uuid,
    period_id: Uuid,
    amount: Decimal,
    description: &str,
    receipt_reference: Option<&str>,
    source_ip: Option<&str>,
) -> EngineResult<ReimbursementRecord> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::Validation {
            message: format!("reimbursement amount must be positive, got {amount}"),
        });
    }
    if description.trim().is_empty() {
        return Err(EngineError::Validation {
            message: "reimbursement description must not be empty".to_string(),
        });
    }

    let mut conn = store.lock()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    directory::require_active_tx(&tx, employee_id)?;
    registry::require_open_tx(&tx, period_id)?;

    let now = Utc::now();
    let record = ReimbursementRecord {
        id: Uuid::new_v4(),
        employee_id,
        period_id,
        amount,
        description: description.to_string(),
        receipt_reference: receipt_reference.map(str::to_string),
        status: ReimbursementStatus::Pending,
        source_ip: source_ip.map(str::to_string),
        created_at: now,
        updated_at: now,
        created_by: employee_id,
        updated_by: None,
    };

    tx.execute(
        "INSERT INTO reimbursements (id, employee_id, period_id, amount, description,
                                     receipt_reference, status, ip_address, created_at,
                                     updated_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?8, ?8, ?2)",
        params![
            record.id.to_string(),
            employee_id.to_string(),
            period_id.to_string(),
            amount.to_string(),
            record.description,
            record.receipt_reference,
            record.source_ip,
            now,
        ],
    )?;
    tx.commit()?;

    info!(
        employee_id = %employee_id,
        period_id = %period_id,
        %amount,
        "submitted reimbursement claim"
    );
    Ok(record)
}

/// Reviews a pending claim, approving or rejecting it.
///
/// Only approved claims are summed into payroll. Claims belonging to a
/// processed period can no longer be reviewed.
///
/// # Errors
///
/// * `ReimbursementNotFound` — unknown claim id.
/// * `AlreadyProcessed` — the owning period has been closed.
/// * `Validation` — the claim is not pending.
pub fn review(
    store: &Store,
    id: Uuid,
    decision: ReviewDecision,
    actor: Uuid,
) -> EngineResult<ReimbursementRecord> {
    let mut conn = store.lock()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let record = get_tx(&tx, id)?;
    registry::require_open_tx(&tx, record.period_id)?;
    if record.status != ReimbursementStatus::Pending {
        return Err(EngineError::Validation {
            message: format!(
                "reimbursement {id} has already been reviewed ({})",
                record.status.as_str()
            ),
        });
    }

    tx.execute(
        "UPDATE reimbursements SET status = ?2, updated_at = ?3, updated_by = ?4 WHERE id = ?1",
        params![
            id.to_string(),
            decision.status().as_str(),
            Utc::now(),
            actor.to_string(),
        ],
    )?;

    let updated = get_tx(&tx, id)?;
    tx.commit()?;

    info!(reimbursement_id = %id, status = updated.status.as_str(), "reviewed reimbursement claim");
    Ok(updated)
}

/// Lists one employee's claims in a period, in submission order.
pub fn list_by_employee_and_period(
    store: &Store,
    employee_id: Uuid,
    period_id: Uuid,
) -> EngineResult<Vec<ReimbursementRecord>> {
    let conn = store.lock()?;
    list_by_employee_and_period_tx(&conn, employee_id, period_id)
}

pub(crate) fn list_by_employee_and_period_tx(
    conn: &Connection,
    employee_id: Uuid,
    period_id: Uuid,
) -> EngineResult<Vec<ReimbursementRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REIMBURSEMENT_COLUMNS} FROM reimbursements
         WHERE employee_id = ?1 AND period_id = ?2
         ORDER BY created_at"
    ))?;
    let records = stmt
        .query_map(
            params![employee_id.to_string(), period_id.to_string()],
            map_reimbursement,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

fn get_tx(conn: &Connection, id: Uuid) -> EngineResult<ReimbursementRecord> {
    let record = conn
        .query_row(
            &format!("SELECT {REIMBURSEMENT_COLUMNS} FROM reimbursements WHERE id = ?1"),
            params![id.to_string()],
            map_reimbursement,
        )
        .optional()?;
    record.ok_or(EngineError::ReimbursementNotFound { id })
}

fn map_reimbursement(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReimbursementRecord> {
    let id: String = row.get(0)?;
    let employee_id: String = row.get(1)?;
    let period_id: String = row.get(2)?;
    let amount: String = row.get(3)?;
    let status_raw: String = row.get(6)?;
    let status = ReimbursementStatus::parse(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown reimbursement status: {status_raw}").into(),
        )
    })?;
    let created_by: String = row.get(10)?;
    let updated_by: Option<String> = row.get(11)?;

    Ok(ReimbursementRecord {
        id: store::column_uuid(&id, 0)?,
        employee_id: store::column_uuid(&employee_id, 1)?,
        period_id: store::column_uuid(&period_id, 2)?,
        amount: store::column_decimal(&amount, 3)?,
        description: row.get(4)?,
        receipt_reference: row.get(5)?,
        status,
        source_ip: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        created_by: store::column_uuid(&created_by, 10)?,
        updated_by: store::column_opt_uuid(updated_by, 11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewEmployee, Role};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct Fixture {
        store: Store,
        admin: Uuid,
        employee: Uuid,
        period: Uuid,
    }

    fn setup() -> Fixture {
        let store = Store::open_in_memory().unwrap();
        let admin = Uuid::new_v4();
        let employee = directory::create(
            &store,
            NewEmployee {
                username: "budi".to_string(),
                password_hash: "$2b$14$hash".to_string(),
                role: Role::Employee,
                base_salary: Some(Decimal::new(2_000_000, 0)),
            },
            admin,
        )
        .unwrap()
        .id;
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
            employee,
            period,
        }
    }

    #[test]
    fn test_submit_creates_pending_claim() {
        let f = setup();
        let record = submit(
            &f.store,
            f.employee,
            f.period,
            dec("150000"),
            "client site taxi",
            Some("RCPT-0042"),
            Some("10.0.0.7"),
        )
        .unwrap();

        assert_eq!(record.status, ReimbursementStatus::Pending);
        assert_eq!(record.amount, dec("150000"));
        assert_eq!(record.receipt_reference.as_deref(), Some("RCPT-0042"));
    }

    #[test]
    fn test_multiple_claims_per_period_allowed() {
        let f = setup();
        submit(&f.store, f.employee, f.period, dec("100"), "taxi", None, None).unwrap();
        submit(&f.store, f.employee, f.period, dec("200"), "meal", None, None).unwrap();
        submit(&f.store, f.employee, f.period, dec("300"), "hotel", None, None).unwrap();

        let records = list_by_employee_and_period(&f.store, f.employee, f.period).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let f = setup();
        for raw in ["0", "-1"] {
            let result = submit(&f.store, f.employee, f.period, dec(raw), "taxi", None, None);
            assert!(matches!(result, Err(EngineError::Validation { .. })));
        }
    }

    #[test]
    fn test_empty_description_rejected() {
        let f = setup();
        let result = submit(&f.store, f.employee, f.period, dec("100"), "  ", None, None);
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_processed_period_rejects_submission() {
        let f = setup();
        registry::mark_processed(&f.store, f.period, f.admin).unwrap();

        let result = submit(&f.store, f.employee, f.period, dec("100"), "taxi", None, None);
        assert!(matches!(result, Err(EngineError::AlreadyProcessed { .. })));
    }

    #[test]
    fn test_inactive_employee_rejected() {
        let f = setup();
        directory::deactivate(&f.store, f.employee, f.admin).unwrap();

        let result = submit(&f.store, f.employee, f.period, dec("100"), "taxi", None, None);
        assert!(matches!(result, Err(EngineError::Unauthorized { .. })));
    }

    #[test]
    fn test_review_approves_pending_claim() {
        let f = setup();
        let claim =
            submit(&f.store, f.employee, f.period, dec("100"), "taxi", None, None).unwrap();

        let approved = review(&f.store, claim.id, ReviewDecision::Approve, f.admin).unwrap();
        assert_eq!(approved.status, ReimbursementStatus::Approved);
        assert_eq!(approved.updated_by, Some(f.admin));
    }

    #[test]
    fn test_review_rejects_pending_claim() {
        let f = setup();
        let claim =
            submit(&f.store, f.employee, f.period, dec("100"), "taxi", None, None).unwrap();

        let rejected = review(&f.store, claim.id, ReviewDecision::Reject, f.admin).unwrap();
        assert_eq!(rejected.status, ReimbursementStatus::Rejected);
    }

    #[test]
    fn test_review_twice_fails() {
        let f = setup();
        let claim =
            submit(&f.store, f.employee, f.period, dec("100"), "taxi", None, None).unwrap();
        review(&f.store, claim.id, ReviewDecision::Approve, f.admin).unwrap();

        let second = review(&f.store, claim.id, ReviewDecision::Reject, f.admin);
        assert!(matches!(second, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_review_unknown_claim_fails() {
        let f = setup();
        let result = review(&f.store, Uuid::new_v4(), ReviewDecision::Approve, f.admin);
        assert!(matches!(
            result,
            Err(EngineError::ReimbursementNotFound { .. })
        ));
    }

    #[test]
    fn test_review_after_period_processed_fails() {
        let f = setup();
        let claim =
            submit(&f.store, f.employee, f.period, dec("100"), "taxi", None, None).unwrap();
        registry::mark_processed(&f.store, f.period, f.admin).unwrap();

        let result = review(&f.store, claim.id, ReviewDecision::Approve, f.admin);
        assert!(matches!(result, Err(EngineError::AlreadyProcessed { .. })));
    }
}
