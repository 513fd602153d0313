//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while recording attendance,
//! overtime, and reimbursements, and while computing payroll.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Input was malformed or out of range; the caller can correct and retry.
    #[error("Validation error: {message}")]
    Validation {
        /// A description of what was invalid.
        message: String,
    },

    /// The referenced attendance period does not exist.
    #[error("Attendance period not found: {id}")]
    PeriodNotFound {
        /// The period identifier that was not found.
        id: Uuid,
    },

    /// The referenced employee does not exist.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee identifier that was not found.
        id: Uuid,
    },

    /// The referenced reimbursement claim does not exist.
    #[error("Reimbursement not found: {id}")]
    ReimbursementNotFound {
        /// The claim identifier that was not found.
        id: Uuid,
    },

    /// The attendance period has already been processed and is immutable.
    ///
    /// Returned both for ledger writes against a closed period and for a
    /// second payroll run over the same period.
    #[error("Attendance period already processed: {id}")]
    AlreadyProcessed {
        /// The identifier of the processed period.
        id: Uuid,
    },

    /// The acting employee is inactive and may not submit records or be paid.
    #[error("Employee is not active: {employee_id}")]
    Unauthorized {
        /// The inactive employee's identifier.
        employee_id: Uuid,
    },

    /// The durable store failed or an atomic commit could not complete.
    #[error("Storage failure: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::Storage {
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
