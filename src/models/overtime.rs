//! Overtime record model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum overtime hours that may be claimed for a single day.
pub const MAX_DAILY_OVERTIME_HOURS: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// A single day's overtime claim for one employee.
///
/// At most one record exists per (employee, date); re-submitting for the same
/// day overwrites the hours and description (latest submission wins, hours do
/// not accumulate). Claimed hours are bounded by
/// [`MAX_DAILY_OVERTIME_HOURS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee this record belongs to.
    pub employee_id: Uuid,
    /// The period the record was submitted against.
    pub period_id: Uuid,
    /// The calendar date the overtime was worked.
    pub date: NaiveDate,
    /// Hours worked, in the half-open range (0, 3].
    pub hours_worked: Decimal,
    /// What the overtime was for.
    pub description: String,
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
