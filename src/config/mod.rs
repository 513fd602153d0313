//! Configuration for payroll computation.
//!
//! Pay policy (overtime rate derivation, currency rounding) is an explicit
//! configuration structure handed to the computation engine, never ambient
//! process state, so the engine stays testable in isolation.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{OvertimeRateConfig, PayrollConfig, RoundingConfig};
