//! Returns and early-withdrawal calculations for fractional real-estate investments
//!
//! One definition of the arithmetic shared by the HTTP endpoint, the CLI and the
//! local fallback used when the backend cannot be reached:
//! - graduated early-withdrawal penalties by year of holding
//! - withdrawal quotes with upfront or ongoing management fees
//! - linear bond-style projections to lock-in and maturity
//! - returns and portfolio roll-ups for held investments

pub mod api;
pub mod config;
pub mod error;
pub mod estimator;
pub mod investment;
pub mod penalty;
pub mod portfolio;
pub mod projection;
pub mod session;
pub mod withdrawal;

pub use config::CalculatorConfig;
pub use error::CalcError;
pub use investment::{FeeDeductionType, GraduatedPenaltyTier, Investment, ManagementFeePolicy};
pub use projection::{project_returns, ProjectionInputs, ProjectionResult};
pub use withdrawal::{calculate_withdrawal_quote, NegativeNetPolicy, QuoteCalculator, WithdrawalQuote};
