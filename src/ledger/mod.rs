//! Submission ledgers for attendance, overtime, and reimbursements.
//!
//! Each ledger validates inside the same store transaction that performs the
//! write, so a period observed open cannot close between the check and the
//! insert. Attendance and overtime are atomic upserts keyed on the store's
//! (employee, date) uniqueness constraint; reimbursements are plain inserts.

pub mod attendance;
pub mod overtime;
pub mod reimbursement;
