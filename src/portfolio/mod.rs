//! Returns for held investments, singly and across a portfolio

mod summary;

pub use summary::{investment_returns, summarize_portfolio, InvestmentReturns, PortfolioSummary};
