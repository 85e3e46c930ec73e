//! Week-level reporting: totals across locations, per-location details and
//! the per-save audit diff.

pub mod aggregate;
pub mod audit;
pub mod details;
