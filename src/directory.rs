//! Employee directory.
//!
//! Credential issuance and verification belong to the auth collaborator;
//! this module carries only the employee surface the engine itself needs:
//! creating records, looking them up, deactivating them, and listing the
//! active ones payroll computation pays.

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, NewEmployee, Role};
use crate::store::{self, Store};

const EMPLOYEE_COLUMNS: &str = "id, username, password_hash, role, base_salary, is_active,
                                created_at, updated_at, created_by, updated_by";

/// Creates a new employee.
///
/// # Errors
///
/// Returns `Validation` if the username is empty or already taken, and
/// `Storage` if the store fails.
pub fn create(store: &Store, new: NewEmployee, actor: Uuid) -> EngineResult<Employee> {
    if new.username.trim().is_empty() {
        return Err(EngineError::Validation {
            message: "username must not be empty".to_string(),
        });
    }

    let mut conn = store.lock()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let taken: bool = tx.query_row(
        "SELECT EXISTS (SELECT 1 FROM employees WHERE username = ?1)",
        params![new.username],
        |row| row.get(0),
    )?;
    if taken {
        return Err(EngineError::Validation {
            message: format!("username '{}' is already taken", new.username),
        });
    }

    let now = Utc::now();
    let employee = Employee {
        id: Uuid::new_v4(),
        username: new.username,
        password_hash: new.password_hash,
        role: new.role,
        base_salary: new.base_salary,
        is_active: true,
        created_at: now,
        updated_at: now,
        created_by: actor,
        updated_by: None,
    };

    tx.execute(
        "INSERT INTO employees (id, username, password_hash, role, base_salary, is_active,
                                created_at, updated_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6, ?7)",
        params![
            employee.id.to_string(),
            employee.username,
            employee.password_hash,
            employee.role.as_str(),
            employee.base_salary.map(|s| s.to_string()),
            now,
            actor.to_string(),
        ],
    )?;
    tx.commit()?;

    info!(employee_id = %employee.id, username = %employee.username, "created employee");
    Ok(employee)
}

/// Fetches an employee by id.
///
/// # Errors
///
/// Returns `EmployeeNotFound` if no such employee exists.
pub fn get(store: &Store, id: Uuid) -> EngineResult<Employee> {
    let conn = store.lock()?;
    get_tx(&conn, id)
}

/// Deactivates an employee, preventing further submissions and payouts.
///
/// # Errors
///
/// Returns `EmployeeNotFound` if no such employee exists.
pub fn deactivate(store: &Store, id: Uuid, actor: Uuid) -> EngineResult<Employee> {
    let mut conn = store.lock()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let hit = tx.execute(
        "UPDATE employees SET is_active = 0, updated_at = ?2, updated_by = ?3 WHERE id = ?1",
        params![id.to_string(), Utc::now(), actor.to_string()],
    )?;
    if hit == 0 {
        return Err(EngineError::EmployeeNotFound { id });
    }

    let employee = get_tx(&tx, id)?;
    tx.commit()?;

    info!(employee_id = %id, "deactivated employee");
    Ok(employee)
}

/// Lists all active employees, ordered by username.
pub fn list_active(store: &Store) -> EngineResult<Vec<Employee>> {
    let conn = store.lock()?;
    list_active_tx(&conn)
}

pub(crate) fn get_tx(conn: &Connection, id: Uuid) -> EngineResult<Employee> {
    let employee = conn
        .query_row(
            &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1"),
            params![id.to_string()],
            map_employee,
        )
        .optional()?;
    employee.ok_or(EngineError::EmployeeNotFound { id })
}

/// Fetches an employee and refuses to proceed unless they are active.
pub(crate) fn require_active_tx(conn: &Connection, id: Uuid) -> EngineResult<Employee> {
    let employee = get_tx(conn, id)?;
    if !employee.is_active {
        return Err(EngineError::Unauthorized { employee_id: id });
    }
    Ok(employee)
}

pub(crate) fn list_active_tx(conn: &Connection) -> EngineResult<Vec<Employee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE is_active = 1 ORDER BY username"
    ))?;
    let employees = stmt
        .query_map([], map_employee)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(employees)
}

fn map_employee(row: &rusqlite::Row<'_>) -> rusqlite::Result<Employee> {
    let id: String = row.get(0)?;
    let role_raw: String = row.get(3)?;
    let role = Role::parse(&role_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("unknown role: {role_raw}").into(),
        )
    })?;
    let base_salary: Option<String> = row.get(4)?;
    let created_by: String = row.get(8)?;
    let updated_by: Option<String> = row.get(9)?;

    Ok(Employee {
        id: store::column_uuid(&id, 0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role,
        base_salary: store::column_opt_decimal(base_salary, 4)?,
        is_active: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        created_by: store::column_uuid(&created_by, 8)?,
        updated_by: store::column_opt_uuid(updated_by, 9)?,
    })
}
