//! Attendance ledger.

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, TransactionBehavior, params};
use tracing::info;
use uuid::Uuid;

use crate::calculation::is_weekend;
use crate::error::{EngineError, EngineResult};
use crate::models::AttendanceRecord;
use crate::store::{self, Store};
use crate::{directory, registry};

const ATTENDANCE_COLUMNS: &str = "id, employee_id, period_id, attendance_date, check_in_time,
                                  check_out_time, is_present, ip_address, created_at, updated_at,
                                  created_by, updated_by";

/// Records a presence punch for one employee on one date.
///
/// The first submission of the day records the check-in and marks the
/// employee present; a second submission on the same day is a check-out, not
/// an error. The insert-or-update is a single atomic statement keyed on the
/// store's (employee, date) uniqueness constraint, so concurrent submissions
/// can never produce duplicate rows.
///
/// # Errors
///
/// * `Unauthorized` — the employee is inactive.
/// * `EmployeeNotFound` / `PeriodNotFound` — unknown references.
/// * `AlreadyProcessed` — the period has been closed by payroll.
/// * `Validation` — the date is a weekend or outside the period's range.
pub fn submit(
    store: &Store,
    employee_id: Uuid,
    period_id: Uuid,
    date: NaiveDate,
    source_ip: Option<&str>,
) -> EngineResult<AttendanceRecord> {
    if is_weekend(date) {
        return Err(EngineError::Validation {
            message: format!("cannot submit attendance on a weekend ({date})"),
        });
    }

    let mut conn = store.lock()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    directory::require_active_tx(&tx, employee_id)?;
    let period = registry::require_open_tx(&tx, period_id)?;
    if !period.contains_date(date) {
        return Err(EngineError::Validation {
            message: format!(
                "date {date} is outside period '{}' ({} to {})",
                period.name, period.start_date, period.end_date
            ),
        });
    }

    let now = Utc::now();
    tx.execute(
        "INSERT INTO attendances (id, employee_id, period_id, attendance_date, check_in_time,
                                  is_present, ip_address, created_at, updated_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?5, ?5, ?2)
         ON CONFLICT (employee_id, attendance_date)
         DO UPDATE SET check_out_time = ?5, updated_at = ?5, updated_by = ?2",
        params![
            Uuid::new_v4().to_string(),
            employee_id.to_string(),
            period_id.to_string(),
            date,
            now,
            source_ip,
        ],
    )?;

    let record = get_by_date_tx(&tx, employee_id, date)?;
    tx.commit()?;

    info!(
        employee_id = %employee_id,
        period_id = %period_id,
        %date,
        check_out = record.check_out.is_some(),
        "recorded attendance punch"
    );
    Ok(record)
}

/// Lists one employee's attendance records in a period, ordered by date.
pub fn list_by_employee_and_period(
    store: &Store,
    employee_id: Uuid,
    period_id: Uuid,
) -> EngineResult<Vec<AttendanceRecord>> {
    let conn = store.lock()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendances
         WHERE employee_id = ?1 AND period_id = ?2
         ORDER BY attendance_date"
    ))?;
    let records = stmt
        .query_map(
            params![employee_id.to_string(), period_id.to_string()],
            map_attendance,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

fn get_by_date_tx(
    conn: &Connection,
    employee_id: Uuid,
    date: NaiveDate,
) -> EngineResult<AttendanceRecord> {
    let record = conn.query_row(
        &format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances
             WHERE employee_id = ?1 AND attendance_date = ?2"
        ),
        params![employee_id.to_string(), date],
        map_attendance,
    )?;
    Ok(record)
}

fn map_attendance(row: &rusqlite::Row<'_>) -> rusqlite::Result<AttendanceRecord> {
    let id: String = row.get(0)?;
    let employee_id: String = row.get(1)?;
    let period_id: String = row.get(2)?;
    let created_by: String = row.get(10)?;
    let updated_by: Option<String> = row.get(11)?;

    Ok(AttendanceRecord {
        id: store::column_uuid(&id, 0)?,
        employee_id: store::column_uuid(&employee_id, 1)?,
        period_id: store::column_uuid(&period_id, 2)?,
        date: row.get(3)?,
        check_in: row.get(4)?,
        check_out: row.get(5)?,
        is_present: row.get(6)?,
        source_ip: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        created_by: store::column_uuid(&created_by, 10)?,
        updated_by: store::column_opt_uuid(updated_by, 11)?,
    })
}
