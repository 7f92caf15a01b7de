//! Withdrawal quotes and settlement of negative outcomes

mod quote;
mod settlement;

pub use quote::{calculate_withdrawal_quote, QuoteCalculator, WithdrawalQuote};
pub(crate) use quote::percent_of;
pub use settlement::{payable_amount, NegativeNetPolicy};
