//! Attendance period model.
//!
//! This module contains the [`AttendancePeriod`] type that defines the
//! date window in which attendance, overtime, and reimbursements may be
//! recorded and eventually paid out.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an attendance period with its date range and processing state.
///
/// A period stays open while employees submit ledger records and transitions
/// to `processed` exactly once when payroll is computed for it. After that it
/// is immutable: no further ledger writes are accepted and payroll cannot be
/// recomputed.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AttendancePeriod;
/// use chrono::{NaiveDate, Utc};
/// use uuid::Uuid;
///
/// let period = AttendancePeriod {
///     id: Uuid::new_v4(),
///     name: "June 2025".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 6, 27).unwrap(),
///     is_active: true,
///     processed: false,
///     processed_at: None,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
///     created_by: Uuid::new_v4(),
///     updated_by: None,
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendancePeriod {
    /// Unique identifier for the period.
    pub id: Uuid,
    /// Human-readable name (e.g., "June 2025").
    pub name: String,
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive). Never before `start_date`.
    pub end_date: NaiveDate,
    /// Whether the period is active.
    pub is_active: bool,
    /// Whether payroll has been computed for this period.
    pub processed: bool,
    /// When payroll was computed, if it has been.
    pub processed_at: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
    /// The administrator who created the period.
    pub created_by: Uuid,
    /// The user who last updated the period, if any.
    pub updated_by: Option<Uuid>,
}

impl AttendancePeriod {
    /// Checks if a given date falls within this period.
    ///
    /// The check is inclusive of both start and end dates.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::AttendancePeriod;
    /// use chrono::{NaiveDate, Utc};
    /// use uuid::Uuid;
    ///
    /// let period = AttendancePeriod {
    ///     id: Uuid::new_v4(),
    ///     name: "June 2025".to_string(),
    ///     start_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2025, 6, 27).unwrap(),
    ///     is_active: true,
    ///     processed: false,
    ///     processed_at: None,
    ///     created_at: Utc::now(),
    ///     updated_at: Utc::now(),
    ///     created_by: Uuid::new_v4(),
    ///     updated_by: None,
    /// };
    ///
    /// assert!(period.contains_date(period.start_date));
    /// assert!(period.contains_date(period.end_date));
    /// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    /// ```
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
