//! Withdrawal quote for a single held investment
//!
//! Order of deductions:
//! 1. Penalty percentage from the graduated schedule (0 once matured)
//! 2. Penalty on principal only
//! 3. Management fee on principal + yield, unless it was taken upfront
//! 4. Net = principal + yield - penalty - fee (not rounded, not clamped)

use crate::config::DEFAULT_DAYS_PER_YEAR;
use crate::error::{ensure_finite, CalcError};
use crate::investment::{Investment, ManagementFeePolicy};
use crate::penalty::{holding_year, resolve_penalty_percentage};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Derived on demand; depends on `now`, so never cached
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalQuote {
    pub principal: f64,
    pub rental_yield_earned: f64,
    pub holding_year: u32,
    pub is_matured: bool,
    pub penalty_percentage_applied: f64,
    pub penalty_amount: f64,
    pub total_amount: f64,
    pub management_fee_amount: f64,
    pub net_withdrawal_amount: f64,
}

/// Quote calculator carrying the holding-year length
#[derive(Debug, Clone, Copy)]
pub struct QuoteCalculator {
    days_per_year: f64,
}

impl Default for QuoteCalculator {
    fn default() -> Self {
        Self { days_per_year: DEFAULT_DAYS_PER_YEAR }
    }
}

impl QuoteCalculator {
    pub fn new(days_per_year: f64) -> Self {
        Self { days_per_year }
    }

    pub fn days_per_year(&self) -> f64 {
        self.days_per_year
    }

    /// Quote a withdrawal of `investment` at `now`
    pub fn quote(
        &self,
        investment: &Investment,
        fee: Option<&ManagementFeePolicy>,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalQuote, CalcError> {
        let principal = ensure_finite("principal", investment.principal)?;
        let rental_yield_earned =
            ensure_finite("rentalYieldEarned", investment.rental_yield_earned)?;

        let is_matured = investment.is_matured(now);
        let schedule = investment.penalty_schedule();
        let penalty_percentage = resolve_penalty_percentage(
            &schedule,
            investment.invested_at,
            now,
            is_matured,
            self.days_per_year,
        );

        let penalty_amount = ensure_finite("penaltyAmount", percent_of(principal, penalty_percentage))?;
        let total_amount = ensure_finite("totalAmount", principal + rental_yield_earned)?;
        let fee_rate = fee.map(ManagementFeePolicy::withdrawal_rate).unwrap_or(0.0);
        let management_fee_amount =
            ensure_finite("managementFeeAmount", percent_of(total_amount, fee_rate))?;
        let net_withdrawal_amount = ensure_finite(
            "netWithdrawalAmount",
            principal + rental_yield_earned - penalty_amount - management_fee_amount,
        )?;

        log::debug!(
            "Quote {}: penalty {:.2} ({}%), fee {:.2}, net {:.2}",
            investment.id, penalty_amount, penalty_percentage, management_fee_amount,
            net_withdrawal_amount
        );

        Ok(WithdrawalQuote {
            principal,
            rental_yield_earned,
            holding_year: holding_year(investment.invested_at, now, self.days_per_year),
            is_matured,
            penalty_percentage_applied: penalty_percentage,
            penalty_amount,
            total_amount,
            management_fee_amount,
            net_withdrawal_amount,
        })
    }
}

/// `base × pct / 100`, with a zero base always giving zero
pub(crate) fn percent_of(base: f64, pct: f64) -> f64 {
    if base == 0.0 || pct == 0.0 {
        0.0
    } else {
        base * pct / 100.0
    }
}

/// Quote with the default 365.25-day year
pub fn calculate_withdrawal_quote(
    investment: &Investment,
    fee: Option<&ManagementFeePolicy>,
    now: DateTime<Utc>,
) -> Result<WithdrawalQuote, CalcError> {
    QuoteCalculator::default().quote(investment, fee, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::GraduatedPenaltyTier;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    /// principal 200k, 18k yield, held ~2y3m, tiers 8/5/3
    fn scenario_investment() -> Investment {
        let mut inv = Investment::new("scenario", 200_000.0, now() - Duration::days(822));
        inv.rental_yield_earned = 18_000.0;
        inv.penalty_rate = Some(0.0);
        inv.graduated_penalties = vec![
            GraduatedPenaltyTier::new(1, 8.0),
            GraduatedPenaltyTier::new(2, 5.0),
            GraduatedPenaltyTier::new(3, 3.0),
        ];
        inv
    }

    #[test]
    fn test_scenario_early_withdrawal() {
        let fee = ManagementFeePolicy::ongoing(1.0);
        let q = calculate_withdrawal_quote(&scenario_investment(), Some(&fee), now()).unwrap();

        assert_eq!(q.holding_year, 3);
        assert_eq!(q.penalty_percentage_applied, 3.0);
        assert_relative_eq!(q.penalty_amount, 6_000.0);
        assert_relative_eq!(q.total_amount, 218_000.0);
        assert_relative_eq!(q.management_fee_amount, 2_180.0);
        assert_relative_eq!(q.net_withdrawal_amount, 209_820.0);
    }

    #[test]
    fn test_scenario_after_maturity() {
        let mut inv = scenario_investment();
        inv.is_after_maturity = true;
        let fee = ManagementFeePolicy::ongoing(1.0);
        let q = calculate_withdrawal_quote(&inv, Some(&fee), now()).unwrap();

        assert!(q.is_matured);
        assert_eq!(q.penalty_amount, 0.0);
        assert_relative_eq!(q.net_withdrawal_amount, 215_820.0);
    }

    #[test]
    fn test_upfront_fee_is_zero() {
        let inv = scenario_investment();
        for pct in [0.5, 1.0, 10.0, 99.0] {
            let fee = ManagementFeePolicy::upfront(pct);
            let q = calculate_withdrawal_quote(&inv, Some(&fee), now()).unwrap();
            assert_eq!(q.management_fee_amount, 0.0);
            assert_relative_eq!(q.net_withdrawal_amount, 212_000.0);
        }
    }

    #[test]
    fn test_absent_fee_is_zero() {
        let q = calculate_withdrawal_quote(&scenario_investment(), None, now()).unwrap();
        assert_eq!(q.management_fee_amount, 0.0);
    }

    #[test]
    fn test_penalty_linear_in_principal() {
        let inv = scenario_investment();
        let mut doubled = inv.clone();
        doubled.principal *= 2.0;

        let q1 = calculate_withdrawal_quote(&inv, None, now()).unwrap();
        let q2 = calculate_withdrawal_quote(&doubled, None, now()).unwrap();
        assert_relative_eq!(q2.penalty_amount, 2.0 * q1.penalty_amount);
    }

    #[test]
    fn test_penalty_ignores_yield() {
        let inv = scenario_investment();
        let mut richer = inv.clone();
        richer.rental_yield_earned = 90_000.0;

        let q1 = calculate_withdrawal_quote(&inv, None, now()).unwrap();
        let q2 = calculate_withdrawal_quote(&richer, None, now()).unwrap();
        assert_eq!(q1.penalty_amount, q2.penalty_amount);
    }

    #[test]
    fn test_net_identity() {
        let fee = ManagementFeePolicy::ongoing(2.75);
        let q = calculate_withdrawal_quote(&scenario_investment(), Some(&fee), now()).unwrap();
        assert_eq!(
            q.net_withdrawal_amount,
            q.principal + q.rental_yield_earned - q.penalty_amount - q.management_fee_amount
        );
    }

    #[test]
    fn test_zero_principal_no_nan() {
        let mut inv = scenario_investment();
        inv.principal = 0.0;
        inv.rental_yield_earned = 0.0;
        let fee = ManagementFeePolicy::ongoing(1.0);
        let q = calculate_withdrawal_quote(&inv, Some(&fee), now()).unwrap();
        assert_eq!(q.penalty_amount, 0.0);
        assert_eq!(q.management_fee_amount, 0.0);
        assert_eq!(q.net_withdrawal_amount, 0.0);
    }

    #[test]
    fn test_non_finite_principal_rejected() {
        let mut inv = scenario_investment();
        inv.principal = f64::NAN;
        assert!(matches!(
            calculate_withdrawal_quote(&inv, None, now()),
            Err(CalcError::InvalidAmount { field: "principal", .. })
        ));
    }

    #[test]
    fn test_overflowing_totals_rejected() {
        let mut inv = scenario_investment();
        inv.principal = 1.5e308;
        inv.rental_yield_earned = 1.5e308;
        assert!(matches!(
            calculate_withdrawal_quote(&inv, None, now()),
            Err(CalcError::InvalidAmount { field: "totalAmount", .. })
        ));
    }

    #[test]
    fn test_beyond_last_tier_uses_flat_rate() {
        let mut inv = scenario_investment();
        inv.invested_at = now() - Duration::days(365 * 6);
        inv.penalty_rate = Some(1.5);
        let q = calculate_withdrawal_quote(&inv, None, now()).unwrap();
        assert_eq!(q.penalty_percentage_applied, 1.5);
        assert_relative_eq!(q.penalty_amount, 3_000.0);
    }

    #[test]
    fn test_idempotent() {
        let fee = ManagementFeePolicy::ongoing(1.0);
        let inv = scenario_investment();
        let a = calculate_withdrawal_quote(&inv, Some(&fee), now()).unwrap();
        let b = calculate_withdrawal_quote(&inv, Some(&fee), now()).unwrap();
        assert_eq!(a, b);
    }
}
