//! Attendance period registry.
//!
//! Owns the period records every ledger hangs off. The `processed` flag is
//! only ever set through the compare-and-set in [`claim_for_processing_tx`],
//! which both [`mark_processed`] and the payroll engine go through, so a
//! period can be closed at most once even under concurrent callers.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::AttendancePeriod;
use crate::store::{self, Store};

const PERIOD_COLUMNS: &str = "id, name, start_date, end_date, is_active, payroll_processed,
                              payroll_processed_at, created_at, updated_at, created_by, updated_by";

/// Creates a new attendance period.
///
/// # Errors
///
/// Returns `Validation` if the name is empty or `end_date` precedes
/// `start_date`.
pub fn create(
    store: &Store,
    name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    actor: Uuid,
) -> EngineResult<AttendancePeriod> {
    if name.trim().is_empty() {
        return Err(EngineError::Validation {
            message: "period name must not be empty".to_string(),
        });
    }
    if end_date < start_date {
        return Err(EngineError::Validation {
            message: format!("end date {end_date} must not be before start date {start_date}"),
        });
    }

    let now = Utc::now();
    let period = AttendancePeriod {
        id: Uuid::new_v4(),
        name: name.to_string(),
        start_date,
        end_date,
        is_active: true,
        processed: false,
        processed_at: None,
        created_at: now,
        updated_at: now,
        created_by: actor,
        updated_by: None,
    };

    let conn = store.lock()?;
    conn.execute(
        "INSERT INTO attendance_periods (id, name, start_date, end_date, is_active,
                                         payroll_processed, created_at, updated_at, created_by)
         VALUES (?1, ?2, ?3, ?4, 1, 0, ?5, ?5, ?6)",
        params![
            period.id.to_string(),
            period.name,
            period.start_date,
            period.end_date,
            now,
            actor.to_string(),
        ],
    )?;

    info!(period_id = %period.id, name = %period.name, %start_date, %end_date, "created attendance period");
    Ok(period)
}

/// Lists all periods, newest first.
pub fn list(store: &Store) -> EngineResult<Vec<AttendancePeriod>> {
    let conn = store.lock()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {PERIOD_COLUMNS} FROM attendance_periods ORDER BY created_at DESC"
    ))?;
    let periods = stmt
        .query_map([], map_period)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(periods)
}

/// Fetches a period by id.
///
/// # Errors
///
/// Returns `PeriodNotFound` if no such period exists.
pub fn get(store: &Store, id: Uuid) -> EngineResult<AttendancePeriod> {
    let conn = store.lock()?;
    get_tx(&conn, id)
}

/// Marks a period as processed.
///
/// This is a compare-and-set: of any number of concurrent callers exactly one
/// wins, and every later call fails with `AlreadyProcessed`. Payroll
/// computation performs the same claim inside its own transaction; calling
/// this directly closes a period without computing payouts.
///
/// # Errors
///
/// Returns `PeriodNotFound` for an unknown id and `AlreadyProcessed` if the
/// period is already closed.
pub fn mark_processed(store: &Store, id: Uuid, actor: Uuid) -> EngineResult<AttendancePeriod> {
    let mut conn = store.lock()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    claim_for_processing_tx(&tx, id, actor, Utc::now())?;
    let period = get_tx(&tx, id)?;
    tx.commit()?;

    info!(period_id = %id, "marked attendance period processed");
    Ok(period)
}

pub(crate) fn get_tx(conn: &Connection, id: Uuid) -> EngineResult<AttendancePeriod> {
    let period = conn
        .query_row(
            &format!("SELECT {PERIOD_COLUMNS} FROM attendance_periods WHERE id = ?1"),
            params![id.to_string()],
            map_period,
        )
        .optional()?;
    period.ok_or(EngineError::PeriodNotFound { id })
}

/// Fetches a period and refuses to proceed if it has been processed.
pub(crate) fn require_open_tx(conn: &Connection, id: Uuid) -> EngineResult<AttendancePeriod> {
    let period = get_tx(conn, id)?;
    if period.processed {
        return Err(EngineError::AlreadyProcessed { id });
    }
    Ok(period)
}

/// Atomically claims the period for processing.
///
/// The conditional update only succeeds while `payroll_processed` is still
/// false; a zero row count means some other caller won the claim (or the id
/// is unknown, which is reported as `PeriodNotFound`).
pub(crate) fn claim_for_processing_tx(
    conn: &Connection,
    id: Uuid,
    actor: Uuid,
    at: DateTime<Utc>,
) -> EngineResult<()> {
    let hit = conn.execute(
        "UPDATE attendance_periods
         SET payroll_processed = 1, payroll_processed_at = ?2, updated_at = ?2, updated_by = ?3
         WHERE id = ?1 AND payroll_processed = 0",
        params![id.to_string(), at, actor.to_string()],
    )?;
    if hit == 0 {
        // Lost the claim, or the period never existed.
        get_tx(conn, id)?;
        return Err(EngineError::AlreadyProcessed { id });
    }
    Ok(())
}

fn map_period(row: &rusqlite::Row<'_>) -> rusqlite::Result<AttendancePeriod> {
    let id: String = row.get(0)?;
    let created_by: String = row.get(9)?;
    let updated_by: Option<String> = row.get(10)?;

    Ok(AttendancePeriod {
        id: store::column_uuid(&id, 0)?,
        name: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        is_active: row.get(4)?,
        processed: row.get(5)?,
        processed_at: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        created_by: store::column_uuid(&created_by, 9)?,
        updated_by: store::column_opt_uuid(updated_by, 10)?,
    })
}
