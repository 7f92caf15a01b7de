//! Request and response bodies

use crate::investment::{lenient, Investment, ManagementFeePolicy};
use crate::withdrawal::WithdrawalQuote;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalQuoteRequest {
    pub investment: Investment,
    #[serde(default, deserialize_with = "lenient::fee")]
    pub management_fee: Option<ManagementFeePolicy>,
    /// Pricing time; defaults to the server clock
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalQuoteResponse {
    #[serde(flatten)]
    pub quote: WithdrawalQuote,
    /// Net amount after the negative-net policy
    pub payable_amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReturnsRequest {
    pub investment: Investment,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRequest {
    #[serde(default)]
    pub investments: Vec<Investment>,
    #[serde(default, deserialize_with = "lenient::fee")]
    pub management_fee: Option<ManagementFeePolicy>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
