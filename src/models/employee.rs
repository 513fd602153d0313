//! Employee model and related types.
//!
//! This module defines the [`Employee`] struct and [`Role`] enum for
//! representing workers whose attendance and payouts the engine tracks.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an employee's role within the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administrator: manages periods and runs payroll.
    Admin,
    /// Regular employee: submits attendance, overtime, and reimbursements.
    Employee,
}

impl Role {
    /// Returns the canonical string form used by the durable store.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    /// Parses a stored role string, returning `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }
}

/// Represents an employee record.
///
/// The password credential is carried as an opaque hash and is never
/// serialized; issuing and verifying credentials belongs to the auth
/// collaborator, not this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Opaque password hash. Never exposed through serialization.
    #[serde(skip)]
    pub password_hash: String,
    /// The employee's role.
    pub role: Role,
    /// Optional base monthly salary. Employees without one are skipped
    /// by payroll computation.
    pub base_salary: Option<Decimal>,
    /// Whether the employee may submit records and be paid.
    pub is_active: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
    /// The user who created the record.
    pub created_by: Uuid,
    /// The user who last updated the record, if any.
    pub updated_by: Option<Uuid>,
}

/// Input for creating a new employee via the directory.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// Unique login name.
    pub username: String,
    /// Opaque password hash produced by the auth collaborator.
    pub password_hash: String,
    /// The employee's role.
    pub role: Role,
    /// Optional base monthly salary.
    pub base_salary: Option<Decimal>,
}
