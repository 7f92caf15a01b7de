//! Per-investment returns and the portfolio roll-up

use crate::error::{ensure_finite, CalcError};
use crate::investment::{Investment, ManagementFeePolicy};
use crate::penalty::holding_year;
use crate::withdrawal::{QuoteCalculator, WithdrawalQuote};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentReturns {
    pub id: String,
    pub principal: f64,
    pub rental_yield_earned: f64,
    pub current_appreciation: f64,
    pub current_value: f64,
    pub total_return: f64,
    pub roi_percentage: f64,
    pub holding_year: u32,
    pub is_matured: bool,
}

/// Return on `total_return` over `principal`, 0 when nothing was invested
fn roi_percentage(total_return: f64, principal: f64) -> f64 {
    if principal == 0.0 {
        0.0
    } else {
        total_return * 100.0 / principal
    }
}

fn finite_sum(field: &'static str, values: impl Iterator<Item = f64>) -> Result<f64, CalcError> {
    ensure_finite(field, values.sum())
}

/// Returns earned so far on one investment
pub fn investment_returns(
    investment: &Investment,
    now: DateTime<Utc>,
    days_per_year: f64,
) -> Result<InvestmentReturns, CalcError> {
    let principal = ensure_finite("principal", investment.principal)?;
    let rental_yield_earned = ensure_finite("rentalYieldEarned", investment.rental_yield_earned)?;
    let current_appreciation =
        ensure_finite("currentAppreciation", investment.current_appreciation)?;
    let total_return = ensure_finite("totalReturn", rental_yield_earned + current_appreciation)?;

    Ok(InvestmentReturns {
        id: investment.id.clone(),
        principal,
        rental_yield_earned,
        current_appreciation,
        current_value: ensure_finite("currentValue", principal + current_appreciation)?,
        total_return,
        roi_percentage: ensure_finite("roiPercentage", roi_percentage(total_return, principal))?,
        holding_year: holding_year(investment.invested_at, now, days_per_year),
        is_matured: investment.is_matured(now),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub investment_count: usize,
    pub matured_count: usize,
    pub total_invested: f64,
    pub total_rental_yield: f64,
    pub total_appreciation: f64,
    pub total_current_value: f64,
    pub roi_percentage: f64,
    /// Sum of what every position would pay out if withdrawn now
    pub total_net_withdrawal_value: f64,
    pub investments: Vec<InvestmentReturns>,
    pub quotes: Vec<WithdrawalQuote>,
}

/// Roll up a portfolio; quotes are computed in parallel
///
/// Blocks the calling thread until the rayon pool finishes, so async callers should run
/// this under `spawn_blocking`.
pub fn summarize_portfolio(
    investments: &[Investment],
    fee: Option<&ManagementFeePolicy>,
    now: DateTime<Utc>,
    calculator: &QuoteCalculator,
) -> Result<PortfolioSummary, CalcError> {
    let per_investment: Vec<(InvestmentReturns, WithdrawalQuote)> = investments
        .par_iter()
        .map(|inv| -> Result<_, CalcError> {
            let returns = investment_returns(inv, now, calculator.days_per_year())?;
            let quote = calculator.quote(inv, fee, now)?;
            Ok((returns, quote))
        })
        .collect::<Result<_, _>>()?;

    let (returns, quotes): (Vec<_>, Vec<_>) = per_investment.into_iter().unzip();

    let total_invested = finite_sum("totalInvested", returns.iter().map(|r| r.principal))?;
    let total_rental_yield =
        finite_sum("totalRentalYield", returns.iter().map(|r| r.rental_yield_earned))?;
    let total_appreciation =
        finite_sum("totalAppreciation", returns.iter().map(|r| r.current_appreciation))?;
    let total_current_value =
        finite_sum("totalCurrentValue", returns.iter().map(|r| r.current_value))?;
    let total_net_withdrawal_value =
        finite_sum("totalNetWithdrawalValue", quotes.iter().map(|q| q.net_withdrawal_amount))?;

    log::info!(
        "Portfolio of {} investments: invested {:.2}, current value {:.2}",
        returns.len(), total_invested, total_current_value
    );

    Ok(PortfolioSummary {
        investment_count: returns.len(),
        matured_count: returns.iter().filter(|r| r.is_matured).count(),
        total_invested,
        total_rental_yield,
        total_appreciation,
        total_current_value,
        roi_percentage: ensure_finite(
            "roiPercentage",
            roi_percentage(total_rental_yield + total_appreciation, total_invested),
        )?,
        total_net_withdrawal_value,
        investments: returns,
        quotes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::GraduatedPenaltyTier;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap()
    }

    fn holdings() -> Vec<Investment> {
        let mut a = Investment::new("a", 200_000.0, now() - Duration::days(822));
        a.rental_yield_earned = 18_000.0;
        a.current_appreciation = 12_000.0;
        a.graduated_penalties = vec![
            GraduatedPenaltyTier::new(1, 8.0),
            GraduatedPenaltyTier::new(2, 5.0),
            GraduatedPenaltyTier::new(3, 3.0),
        ];

        let mut b = Investment::new("b", 50_000.0, now() - Duration::days(2000));
        b.rental_yield_earned = 2_000.0;
        b.current_appreciation = -1_000.0;
        b.is_after_maturity = true;

        vec![a, b]
    }

    #[test]
    fn test_investment_returns() {
        let r = investment_returns(&holdings()[0], now(), 365.25).unwrap();
        assert_relative_eq!(r.current_value, 212_000.0);
        assert_relative_eq!(r.total_return, 30_000.0);
        assert_relative_eq!(r.roi_percentage, 15.0, epsilon = 1e-9);
        assert_eq!(r.holding_year, 3);
        assert!(!r.is_matured);
    }

    #[test]
    fn test_zero_principal_roi() {
        let inv = Investment::new("z", 0.0, now());
        let r = investment_returns(&inv, now(), 365.25).unwrap();
        assert_eq!(r.roi_percentage, 0.0);
    }

    #[test]
    fn test_portfolio_totals() {
        let fee = ManagementFeePolicy::ongoing(1.0);
        let s = summarize_portfolio(&holdings(), Some(&fee), now(), &QuoteCalculator::default())
            .unwrap();

        assert_eq!(s.investment_count, 2);
        assert_eq!(s.matured_count, 1);
        assert_relative_eq!(s.total_invested, 250_000.0);
        assert_relative_eq!(s.total_rental_yield, 20_000.0);
        assert_relative_eq!(s.total_appreciation, 11_000.0);
        assert_relative_eq!(s.total_current_value, 261_000.0);
        assert_relative_eq!(s.roi_percentage, 12.4, epsilon = 1e-9);
        // a: 209_820, b: 52_000 - 520
        assert_relative_eq!(s.total_net_withdrawal_value, 209_820.0 + 51_480.0);
        // Order follows input
        assert_eq!(s.investments[0].id, "a");
        assert_eq!(s.quotes.len(), 2);
    }

    #[test]
    fn test_portfolio_upfront_fee() {
        let fee = ManagementFeePolicy::upfront(1.0);
        let s = summarize_portfolio(&holdings(), Some(&fee), now(), &QuoteCalculator::default())
            .unwrap();

        assert!(s.quotes.iter().all(|q| q.management_fee_amount == 0.0));
        // a: 218_000 - 6_000 penalty, b: matured 52_000
        assert_relative_eq!(s.total_net_withdrawal_value, 212_000.0 + 52_000.0);
    }

    #[test]
    fn test_portfolio_totals_overflow() {
        let invs = vec![
            Investment::new("x", 1.5e308, now()),
            Investment::new("y", 1.5e308, now()),
        ];
        assert!(matches!(
            summarize_portfolio(&invs, None, now(), &QuoteCalculator::default()),
            Err(CalcError::InvalidAmount { field: "totalInvested", .. })
        ));
    }

    #[test]
    fn test_empty_portfolio() {
        let s = summarize_portfolio(&[], None, now(), &QuoteCalculator::default()).unwrap();
        assert_eq!(s.investment_count, 0);
        assert_eq!(s.roi_percentage, 0.0);
        assert_eq!(s.total_net_withdrawal_value, 0.0);
    }

    #[test]
    fn test_bad_investment_fails_portfolio() {
        let mut invs = holdings();
        invs[1].rental_yield_earned = f64::INFINITY;
        assert!(summarize_portfolio(&invs, None, now(), &QuoteCalculator::default()).is_err());
    }
}
