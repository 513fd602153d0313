//! Overtime ledger.

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, TransactionBehavior, params};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{MAX_DAILY_OVERTIME_HOURS, OvertimeRecord};
use crate::store::{self, Store};
use crate::{directory, registry};

const OVERTIME_COLUMNS: &str = "id, employee_id, period_id, overtime_date, hours_worked,
                                description, ip_address, created_at, updated_at,
                                created_by, updated_by";

/// Records an overtime claim for one employee on one date.
///
/// Re-submitting for the same day overwrites the previous hours and
/// description; the latest submission wins and hours never accumulate.
/// The insert-or-update is a single atomic statement keyed on the store's
/// (employee, date) uniqueness constraint.
///
/// # Errors
///
/// * `Unauthorized` — the employee is inactive.
/// * `EmployeeNotFound` / `PeriodNotFound` — unknown references.
/// * `AlreadyProcessed` — the period has been closed by payroll.
/// * `Validation` — `hours_worked` is not in the range (0, 3].
pub fn submit(
    store: &Store,
    employee_id: Uuid,
    period_id: Uuid,
    date: NaiveDate,
    hours_worked: Decimal,
    description: &str,
    source_ip: Option<&str>,
) -> EngineResult<OvertimeRecord> {
    if hours_worked <= Decimal::ZERO || hours_worked > MAX_DAILY_OVERTIME_HOURS {
        return Err(EngineError::Validation {
            message: format!(
                "overtime hours must be greater than 0 and at most {MAX_DAILY_OVERTIME_HOURS}, got {hours_worked}"
            ),
        });
    }

    let mut conn = store.lock()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    directory::require_active_tx(&tx, employee_id)?;
    registry::require_open_tx(&tx, period_id)?;

    let now = Utc::now();
    tx.execute(
        "INSERT INTO overtimes (id, employee_id, period_id, overtime_date, hours_worked,
                                description, ip_address, created_at, updated_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8, ?2)
         ON CONFLICT (employee_id, overtime_date)
         DO UPDATE SET hours_worked = ?5, description = ?6, updated_at = ?8, updated_by = ?2",
        params![
            Uuid::new_v4().to_string(),
            employee_id.to_string(),
            period_id.to_string(),
            date,
            hours_worked.to_string(),
            description,
            source_ip,
            now,
        ],
    )?;

    let record = get_by_date_tx(&tx, employee_id, date)?;
    tx.commit()?;

    info!(
        employee_id = %employee_id,
        period_id = %period_id,
        %date,
        hours = %record.hours_worked,
        "recorded overtime claim"
    );
    Ok(record)
}

/// Lists one employee's overtime records in a period, ordered by date.
pub fn list_by_employee_and_period(
    store: &Store,
    employee_id: Uuid,
    period_id: Uuid,
) -> EngineResult<Vec<OvertimeRecord>> {
    let conn = store.lock()?;
    list_by_employee_and_period_tx(&conn, employee_id, period_id)
}

pub(crate) fn list_by_employee_and_period_tx(
    conn: &Connection,
    employee_id: Uuid,
    period_id: Uuid,
) -> EngineResult<Vec<OvertimeRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {OVERTIME_COLUMNS} FROM overtimes
         WHERE employee_id = ?1 AND period_id = ?2
         ORDER BY overtime_date"
    ))?;
    let records = stmt
        .query_map(
            params![employee_id.to_string(), period_id.to_string()],
            map_overtime,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

fn get_by_date_tx(
    conn: &Connection,
    employee_id: Uuid,
    date: NaiveDate,
) -> EngineResult<OvertimeRecord> {
    let record = conn.query_row(
        &format!(
            "SELECT {OVERTIME_COLUMNS} FROM overtimes
             WHERE employee_id = ?1 AND overtime_date = ?2"
        ),
        params![employee_id.to_string(), date],
        map_overtime,
    )?;
    Ok(record)
}

fn map_overtime(row: &rusqlite::Row<'_>) -> rusqlite::Result<OvertimeRecord> {
    let id: String = row.get(0)?;
    let employee_id: String = row.get(1)?;
    let period_id: String = row.get(2)?;
    let hours_worked: String = row.get(4)?;
    let created_by: String = row.get(9)?;
    let updated_by: Option<String> = row.get(10)?;

    Ok(OvertimeRecord {
        id: store::column_uuid(&id, 0)?,
        employee_id: store::column_uuid(&employee_id, 1)?,
        period_id: store::column_uuid(&period_id, 2)?,
        date: row.get(3)?,
        hours_worked: store::column_decimal(&hours_worked, 4)?,
        description: row.get(5)?,
        source_ip: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        created_by: store::column_uuid(&created_by, 9)?,
        updated_by: store::column_opt_uuid(updated_by, 10)?,
    })
}
