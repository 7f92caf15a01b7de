//! Projection engine

use super::cashflows::{EarlyWithdrawalEstimate, ProjectionResult, ProjectionRow};
use super::MAX_PROJECTION_YEARS;
use crate::error::{ensure_finite, CalcError};
use crate::investment::{lenient, GraduatedPenaltyTier};
use crate::penalty::{holding_year_for_years, GraduatedPenaltySchedule};
use crate::withdrawal::percent_of;
use serde::{Deserialize, Serialize};

/// Terms of a hypothetical purchase, as posted to `calculate-returns`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInputs {
    pub units: u32,

    #[serde(alias = "sharePrice")]
    pub price_per_share: f64,

    /// Annual rental yield, percent of the investment amount
    #[serde(default, alias = "rentalYield")]
    pub rental_yield_rate_percent: f64,

    /// Annual appreciation, percent of the investment amount
    #[serde(default, alias = "appreciationRate")]
    pub appreciation_rate_percent: f64,

    #[serde(default, alias = "lockingPeriod")]
    pub locking_period_years: u32,

    #[serde(default, alias = "bondMaturity")]
    pub bond_maturity_years: u32,

    #[serde(default, deserialize_with = "lenient::tiers")]
    pub graduated_penalties: Vec<GraduatedPenaltyTier>,

    /// Flat penalty when no tier matches
    #[serde(default, deserialize_with = "lenient::optional_rate")]
    pub penalty_rate: Option<f64>,

    /// Hypothetical exit time, in years after purchase
    #[serde(default)]
    pub withdrawal_after_years: Option<f64>,
}

impl ProjectionInputs {
    pub fn new(units: u32, price_per_share: f64) -> Self {
        Self {
            units,
            price_per_share,
            rental_yield_rate_percent: 0.0,
            appreciation_rate_percent: 0.0,
            locking_period_years: 0,
            bond_maturity_years: 0,
            graduated_penalties: Vec::new(),
            penalty_rate: None,
            withdrawal_after_years: None,
        }
    }
}

/// Intermediate annual figures shared by every horizon
struct AnnualFigures {
    investment_amount: f64,
    annual_rental_income: f64,
    annual_appreciation: f64,
    total_annual_return: f64,
}

impl AnnualFigures {
    fn value_at(&self, years: f64) -> f64 {
        self.investment_amount + self.total_annual_return * years
    }
}

/// Reject horizons that would build an unreasonably long schedule
fn ensure_horizon(field: &'static str, years: f64) -> Result<(), CalcError> {
    if years > MAX_PROJECTION_YEARS as f64 {
        return Err(CalcError::HorizonTooLong { field, years, max: MAX_PROJECTION_YEARS });
    }
    Ok(())
}

/// Project returns for `inputs`
pub fn project_returns(inputs: &ProjectionInputs) -> Result<ProjectionResult, CalcError> {
    if inputs.units == 0 {
        return Err(CalcError::InvalidUnits(inputs.units));
    }
    ensure_horizon("lockingPeriodYears", inputs.locking_period_years as f64)?;
    ensure_horizon("bondMaturityYears", inputs.bond_maturity_years as f64)?;
    let price = ensure_finite("pricePerShare", inputs.price_per_share)?;
    let rental_pct = ensure_finite("rentalYieldRatePercent", inputs.rental_yield_rate_percent)?;
    let appreciation_pct =
        ensure_finite("appreciationRatePercent", inputs.appreciation_rate_percent)?;

    // Derived figures can overflow even when every input is finite
    let investment_amount = ensure_finite("investmentAmount", inputs.units as f64 * price)?;
    let annual_rental_income =
        ensure_finite("annualRentalIncome", percent_of(investment_amount, rental_pct))?;
    let annual_appreciation =
        ensure_finite("annualAppreciation", percent_of(investment_amount, appreciation_pct))?;
    let figures = AnnualFigures {
        investment_amount,
        annual_rental_income,
        annual_appreciation,
        total_annual_return: ensure_finite(
            "totalAnnualReturn",
            annual_rental_income + annual_appreciation,
        )?,
    };

    let schedule = GraduatedPenaltySchedule::new(
        inputs.graduated_penalties.clone(),
        inputs.penalty_rate.unwrap_or(0.0),
    );
    let locking = inputs.locking_period_years;

    let early_withdrawal = match inputs.withdrawal_after_years {
        Some(years) => {
            let years = ensure_finite("withdrawalAfterYears", years)?.max(0.0);
            ensure_horizon("withdrawalAfterYears", years)?;
            Some(exit_estimate(&figures, &schedule, years, locking)?)
        }
        None => None,
    };

    let rows = (1..=inputs.bond_maturity_years)
        .map(|year| -> Result<ProjectionRow, CalcError> {
            let exit = exit_estimate(&figures, &schedule, year as f64, locking)?;
            Ok(ProjectionRow {
                year,
                projected_value: exit.projected_value,
                cumulative_rental_income: ensure_finite(
                    "cumulativeRentalIncome",
                    figures.annual_rental_income * year as f64,
                )?,
                cumulative_appreciation: ensure_finite(
                    "cumulativeAppreciation",
                    figures.annual_appreciation * year as f64,
                )?,
                within_lock_in: exit.within_lock_in,
                penalty_percentage: exit.penalty_percentage,
                amount_after_penalty: exit.amount_after_penalty,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let value_at_bond_maturity = ensure_finite(
        "valueAtBondMaturity",
        figures.value_at(inputs.bond_maturity_years as f64),
    )?;
    let result = ProjectionResult {
        investment_amount,
        annual_rental_income: figures.annual_rental_income,
        annual_appreciation: figures.annual_appreciation,
        total_annual_return: figures.total_annual_return,
        locking_period_years: locking,
        bond_maturity_years: inputs.bond_maturity_years,
        value_at_locking_period: ensure_finite(
            "valueAtLockingPeriod",
            figures.value_at(locking as f64),
        )?,
        value_at_bond_maturity,
        total_return_at_maturity: ensure_finite(
            "totalReturnAtMaturity",
            value_at_bond_maturity - investment_amount,
        )?,
        early_withdrawal,
        schedule: rows,
    };
    log::debug!(
        "Projected {} units at {:.2}: {:.2} at lock-in, {:.2} at maturity",
        inputs.units, price, result.value_at_locking_period, result.value_at_bond_maturity
    );
    Ok(result)
}

/// Exit after `years_held`; penalised only while inside the lock-in period
fn exit_estimate(
    figures: &AnnualFigures,
    schedule: &GraduatedPenaltySchedule,
    years_held: f64,
    locking_period_years: u32,
) -> Result<EarlyWithdrawalEstimate, CalcError> {
    let holding_year = holding_year_for_years(years_held);
    let within_lock_in = years_held < locking_period_years as f64;
    let penalty_percentage = if within_lock_in { schedule.rate_for_year(holding_year) } else { 0.0 };
    let penalty_amount = percent_of(figures.investment_amount, penalty_percentage);
    let projected_value = ensure_finite("projectedValue", figures.value_at(years_held))?;

    Ok(EarlyWithdrawalEstimate {
        years_held,
        holding_year,
        within_lock_in,
        penalty_percentage,
        penalty_amount,
        projected_value,
        amount_after_penalty: ensure_finite("amountAfterPenalty", projected_value - penalty_amount)?,
    })
}
