//! Projection output rows

use serde::{Deserialize, Serialize};

/// Position at the end of one projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRow {
    /// Years held at the end of this row
    pub year: u32,
    pub projected_value: f64,
    pub cumulative_rental_income: f64,
    pub cumulative_appreciation: f64,
    /// Still inside the lock-in period, so an exit here is penalised
    pub within_lock_in: bool,
    pub penalty_percentage: f64,
    pub amount_after_penalty: f64,
}

/// Estimate for exiting a hypothetical purchase after `years_held`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyWithdrawalEstimate {
    pub years_held: f64,
    pub holding_year: u32,
    pub within_lock_in: bool,
    pub penalty_percentage: f64,
    /// Charged on the investment amount only
    pub penalty_amount: f64,
    pub projected_value: f64,
    pub amount_after_penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub investment_amount: f64,
    pub annual_rental_income: f64,
    pub annual_appreciation: f64,
    pub total_annual_return: f64,
    pub locking_period_years: u32,
    pub bond_maturity_years: u32,
    pub value_at_locking_period: f64,
    pub value_at_bond_maturity: f64,
    pub total_return_at_maturity: f64,
    pub early_withdrawal: Option<EarlyWithdrawalEstimate>,
    pub schedule: Vec<ProjectionRow>,
}
