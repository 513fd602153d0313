//! Payroll Period Processing Engine
//!
//! This crate tracks employee attendance, overtime, and reimbursements within
//! administrator-defined pay periods, and computes each employee's payout for
//! a period exactly once. Ledger writes are atomic conditional upserts keyed
//! on store-level uniqueness constraints, and the payroll run commits its
//! results together with the period's processed flag in a single transaction,
//! so a period can never be paid twice or partially.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod models;
pub mod payroll;
pub mod registry;
pub mod store;
