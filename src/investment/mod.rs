//! Investment data structures and bulk loading

mod data;
pub(crate) mod lenient;
pub mod loader;

pub use data::{FeeDeductionType, GraduatedPenaltyTier, Investment, ManagementFeePolicy};
pub use loader::{load_investments, load_investments_from_reader, load_investments_json};
