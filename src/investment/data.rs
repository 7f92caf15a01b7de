//! Held investment snapshot and management fee terms

use super::lenient;
use crate::penalty::GraduatedPenaltySchedule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Early-withdrawal penalty for one year of holding
///
/// Missing or malformed fields deserialize to zero: a tier without a usable year never
/// matches, and one without a usable percentage charges nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraduatedPenaltyTier {
    /// Holding year this tier covers (1 = first year)
    #[serde(default, deserialize_with = "lenient::year")]
    pub year: u32,
    /// Penalty charged on principal, 0 to 100
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub penalty_percentage: f64,
}

impl GraduatedPenaltyTier {
    pub fn new(year: u32, penalty_percentage: f64) -> Self {
        Self { year, penalty_percentage }
    }

    /// Year 0, NaN and out-of-range percentages never match a lookup
    pub fn is_valid(&self) -> bool {
        self.year >= 1
            && self.penalty_percentage.is_finite()
            && (0.0..=100.0).contains(&self.penalty_percentage)
    }
}

/// When the management fee is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeDeductionType {
    /// Taken at purchase; nothing left to deduct at withdrawal
    Upfront,
    /// Taken at withdrawal from principal plus accrued yield
    #[default]
    Ongoing,
    /// Unrecognised deduction type; no fee is charged
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementFeePolicy {
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub percentage: f64,
    #[serde(default, deserialize_with = "lenient::deduction_type")]
    pub deduction_type: FeeDeductionType,
}

impl ManagementFeePolicy {
    pub fn ongoing(percentage: f64) -> Self {
        Self { percentage, deduction_type: FeeDeductionType::Ongoing }
    }

    pub fn upfront(percentage: f64) -> Self {
        Self { percentage, deduction_type: FeeDeductionType::Upfront }
    }

    /// Fee percentage still owed at withdrawal time (0 for upfront or malformed fees)
    pub fn withdrawal_rate(&self) -> f64 {
        match self.deduction_type {
            FeeDeductionType::Upfront | FeeDeductionType::Unknown => 0.0,
            FeeDeductionType::Ongoing => {
                if self.percentage.is_finite() && self.percentage > 0.0 {
                    self.percentage
                } else {
                    0.0
                }
            }
        }
    }
}

/// Snapshot of a held investment as returned by the portfolio API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(default)]
    pub id: String,

    /// Amount originally invested
    #[serde(default, alias = "amount")]
    pub principal: f64,

    #[serde(alias = "investmentDate")]
    pub invested_at: DateTime<Utc>,

    #[serde(default)]
    pub maturity_date: Option<DateTime<Utc>>,

    /// Rental yield accrued to date
    #[serde(default)]
    pub rental_yield_earned: f64,

    /// Current appreciation over principal
    #[serde(default, alias = "currentValue")]
    pub current_appreciation: f64,

    #[serde(default)]
    pub is_after_maturity: bool,

    /// Flat penalty used when no tier matches the holding year
    #[serde(default, deserialize_with = "lenient::optional_rate")]
    pub penalty_rate: Option<f64>,

    #[serde(default, deserialize_with = "lenient::tiers")]
    pub graduated_penalties: Vec<GraduatedPenaltyTier>,
}

impl Investment {
    /// New investment with no yield, appreciation or penalties yet
    pub fn new(id: impl Into<String>, principal: f64, invested_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            principal,
            invested_at,
            maturity_date: None,
            rental_yield_earned: 0.0,
            current_appreciation: 0.0,
            is_after_maturity: false,
            penalty_rate: None,
            graduated_penalties: Vec::new(),
        }
    }

    /// Matured when flagged, or when the maturity date has passed
    pub fn is_matured(&self, now: DateTime<Utc>) -> bool {
        self.is_after_maturity || self.maturity_date.is_some_and(|m| m <= now)
    }

    /// Penalty schedule built from this investment's tiers and flat rate
    pub fn penalty_schedule(&self) -> GraduatedPenaltySchedule {
        GraduatedPenaltySchedule::new(
            self.graduated_penalties.clone(),
            self.penalty_rate.unwrap_or(0.0),
        )
    }
}
