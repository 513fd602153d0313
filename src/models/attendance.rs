//! Attendance record model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single day's presence record for one employee.
///
/// At most one record exists per (employee, date); the uniqueness is enforced
/// by the durable store. The first submission of a day records the check-in,
/// a second submission on the same day records the check-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee this record belongs to.
    pub employee_id: Uuid,
    /// The period the record was submitted against.
    pub period_id: Uuid,
    /// The calendar date of attendance. Never a weekend.
    pub date: NaiveDate,
    /// When the employee punched in.
    pub check_in: Option<DateTime<Utc>>,
    /// When the employee punched out, if they have.
    pub check_out: Option<DateTime<Utc>>,
    /// Whether the employee counts as present on this date.
    pub is_present: bool,
    /// The network address the submission came from, kept for audit.
    pub source_ip: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
    /// The user who created the record.
    pub created_by: Uuid,
    /// The user who last updated the record, if any.
    pub updated_by: Option<Uuid>,
}
