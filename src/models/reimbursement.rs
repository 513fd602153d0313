//! Reimbursement claim model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Approval state of a reimbursement claim.
///
/// Claims are created as [`Pending`](ReimbursementStatus::Pending) and only
/// [`Approved`](ReimbursementStatus::Approved) claims are paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReimbursementStatus {
    /// Awaiting review.
    Pending,
    /// Approved for payout.
    Approved,
    /// Rejected; excluded from payout.
    Rejected,
}

impl ReimbursementStatus {
    /// Returns the canonical string form used by the durable store.
    pub fn as_str(self) -> &'static str {
        match self {
            ReimbursementStatus::Pending => "pending",
            ReimbursementStatus::Approved => "approved",
            ReimbursementStatus::Rejected => "rejected",
        }
    }

    /// Parses a stored status string, returning `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReimbursementStatus::Pending),
            "approved" => Some(ReimbursementStatus::Approved),
            "rejected" => Some(ReimbursementStatus::Rejected),
            _ => None,
        }
    }
}

/// An expense claim submitted by an employee against a period.
///
/// Unlike attendance and overtime there is no per-day uniqueness: every
/// submission is an independent claim and a period may hold many of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReimbursementRecord {
    /// Unique identifier for the claim.
    pub id: Uuid,
    /// The employee this claim belongs to.
    pub employee_id: Uuid,
    /// The period the claim was submitted against.
    pub period_id: Uuid,
    /// The claimed amount. Always positive.
    pub amount: Decimal,
    /// What the expense was for. Never empty.
    pub description: String,
    /// Optional reference to the supporting receipt.
    pub receipt_reference: Option<String>,
    /// The claim's approval state.
    pub status: ReimbursementStatus,
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
