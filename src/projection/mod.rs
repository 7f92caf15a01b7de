//! Bond-style return projection for a prospective purchase
//!
//! Returns grow linearly: every year adds the same rental income and appreciation,
//! both computed on the original investment amount (no compounding).

mod engine;
mod cashflows;

pub use engine::{project_returns, ProjectionInputs};
pub use cashflows::{EarlyWithdrawalEstimate, ProjectionResult, ProjectionRow};

/// Longest lock-in, maturity or exit horizon accepted, in years
pub const MAX_PROJECTION_YEARS: u32 = 100;
