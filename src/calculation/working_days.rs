//! Working-day calendar functionality.
//!
//! A working day is any non-weekend calendar date; the prorated share of a
//! salary is paid against the number of working days in the period.

use chrono::{Datelike, NaiveDate, Weekday};

/// Returns true for Saturday and Sunday.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::is_weekend;
/// use chrono::NaiveDate;
///
/// assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 6, 7).unwrap())); // Saturday
/// assert!(!is_weekend(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap())); // Monday
/// ```
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Iterates the working (non-weekend) dates in `[start, end]`.
///
/// Yields nothing when `end` precedes `start`.
pub fn working_dates(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .take_while(move |d| *d <= end)
        .filter(|d| !is_weekend(*d))
}

/// Counts the working (non-weekend) dates in `[start, end]`, inclusive.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::count_working_days;
/// use chrono::NaiveDate;
///
/// // Four full Monday-to-Friday weeks.
/// let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 6, 27).unwrap();
/// assert_eq!(count_working_days(start, end), 20);
/// ```
pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    working_dates(start, end).count() as u32
}
