//! SQLite-backed durable store for the payroll engine.
//!
//! Uses rusqlite with WAL mode and a mutex-guarded connection. The schema's
//! UNIQUE constraints are the source of truth for ledger upserts, and the
//! `payroll_processed` flag lives in the same store as the ledgers so the
//! close-period compare-and-set and the payroll commit share one transaction.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use rusqlite::types::Type;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Handle to the durable store.
///
/// Cheap to share by reference across threads; all operations lock the
/// underlying connection for their duration.
pub struct Store {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS employees (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'employee',
        base_salary TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        created_by TEXT NOT NULL,
        updated_by TEXT
    );

    CREATE TABLE IF NOT EXISTS attendance_periods (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        payroll_processed INTEGER NOT NULL DEFAULT 0,
        payroll_processed_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        created_by TEXT NOT NULL,
        updated_by TEXT
    );

    CREATE TABLE IF NOT EXISTS attendances (
        id TEXT PRIMARY KEY,
        employee_id TEXT NOT NULL REFERENCES employees(id),
        period_id TEXT NOT NULL REFERENCES attendance_periods(id),
        attendance_date TEXT NOT NULL,
        check_in_time TEXT,
        check_out_time TEXT,
        is_present INTEGER NOT NULL DEFAULT 1,
        ip_address TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        created_by TEXT NOT NULL,
        updated_by TEXT,
        UNIQUE (employee_id, attendance_date)
    );
    CREATE INDEX IF NOT EXISTS idx_attendances_period
        ON attendances (period_id, employee_id);

    CREATE TABLE IF NOT EXISTS overtimes (
        id TEXT PRIMARY KEY,
        employee_id TEXT NOT NULL REFERENCES employees(id),
        period_id TEXT NOT NULL REFERENCES attendance_periods(id),
        overtime_date TEXT NOT NULL,
        hours_worked TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        ip_address TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        created_by TEXT NOT NULL,
        updated_by TEXT,
        UNIQUE (employee_id, overtime_date)
    );
    CREATE INDEX IF NOT EXISTS idx_overtimes_period
        ON overtimes (period_id, employee_id);

    CREATE TABLE IF NOT EXISTS reimbursements (
        id TEXT PRIMARY KEY,
        employee_id TEXT NOT NULL REFERENCES employees(id),
        period_id TEXT NOT NULL REFERENCES attendance_periods(id),
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        receipt_reference TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        ip_address TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        created_by TEXT NOT NULL,
        updated_by TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_reimbursements_period
        ON reimbursements (period_id, employee_id);

    CREATE TABLE IF NOT EXISTS payroll_results (
        id TEXT PRIMARY KEY,
        employee_id TEXT NOT NULL REFERENCES employees(id),
        period_id TEXT NOT NULL REFERENCES attendance_periods(id),
        present_days INTEGER NOT NULL,
        working_days INTEGER NOT NULL,
        prorated_base TEXT NOT NULL,
        overtime_pay TEXT NOT NULL,
        reimbursement_total TEXT NOT NULL,
        total_pay TEXT NOT NULL,
        computed_at TEXT NOT NULL,
        UNIQUE (employee_id, period_id)
    );
";

impl Store {
    /// Opens (creating if needed) the store at the given file path.
    ///
    /// Applies pragmas and creates the schema. The schema is idempotent, so
    /// reopening an existing database is safe.
    pub fn open<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;",
        )?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened payroll store at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a fresh in-memory store. Used by tests and benchmarks.
    pub fn open_in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Locks the underlying connection.
    pub(crate) fn lock(&self) -> EngineResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| EngineError::Storage {
            message: "store connection mutex poisoned".to_string(),
        })
    }
}

/// Parses a stored UUID column value inside a row-mapping closure.
pub(crate) fn column_uuid(raw: &str, idx: usize) -> rusqlite::Result<Uuid> {
    Uuid::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parses an optional stored UUID column value.
pub(crate) fn column_opt_uuid(raw: Option<String>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    raw.map(|s| column_uuid(&s, idx)).transpose()
}

/// Parses a stored decimal column value inside a row-mapping closure.
pub(crate) fn column_decimal(raw: &str, idx: usize) -> rusqlite::Result<Decimal> {
    Decimal::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parses an optional stored decimal column value.
pub(crate) fn column_opt_decimal(
    raw: Option<String>,
    idx: usize,
) -> rusqlite::Result<Option<Decimal>> {
    raw.map(|s| column_decimal(&s, idx)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_creates_schema() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (
                    'employees', 'attendance_periods', 'attendances',
                    'overtimes', 'reimbursements', 'payroll_results')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 6);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.lock().unwrap();
        // Re-running the schema batch must not fail on the existing tables.
        conn.execute_batch(SCHEMA).unwrap();
    }

    #[test]
    fn test_attendance_uniqueness_constraint_enforced() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.lock().unwrap();
        conn.execute_batch(
            "INSERT INTO employees (id, username, password_hash, created_at, updated_at, created_by)
             VALUES ('e', 'budi', 'x', 't', 't', 'e');
             INSERT INTO attendance_periods (id, name, start_date, end_date, created_at, updated_at, created_by)
             VALUES ('p', 'June 2025', '2025-06-02', '2025-06-27', 't', 't', 'e');",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO attendances (id, employee_id, period_id, attendance_date,
                                      created_at, updated_at, created_by)
             VALUES ('a', 'e', 'p', '2025-06-03', 't', 't', 'e')",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO attendances (id, employee_id, period_id, attendance_date,
                                      created_at, updated_at, created_by)
             VALUES ('b', 'e', 'p', '2025-06-03', 't', 't', 'e')",
            [],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_column_decimal_rejects_garbage() {
        assert!(column_decimal("not-a-number", 0).is_err());
        assert_eq!(
            column_decimal("1800000", 0).unwrap(),
            Decimal::new(1_800_000, 0)
        );
    }

    #[test]
    fn test_column_uuid_round_trip() {
        let id = Uuid::new_v4();
        assert_eq!(column_uuid(&id.to_string(), 0).unwrap(), id);
        assert!(column_uuid("nope", 0).is_err());
    }
}
