//! Policy for quotes whose deductions exceed principal plus yield

use super::WithdrawalQuote;
use crate::error::CalcError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegativeNetPolicy {
    /// Refuse the withdrawal
    #[default]
    Reject,
    /// Pay out nothing
    Clamp,
    /// Pass the negative amount through as a debt
    Allow,
}

/// Amount actually payable for a quote under `policy`
pub fn payable_amount(quote: &WithdrawalQuote, policy: NegativeNetPolicy) -> Result<f64, CalcError> {
    let net = quote.net_withdrawal_amount;
    if net >= 0.0 {
        return Ok(net);
    }
    match policy {
        NegativeNetPolicy::Reject => {
            log::warn!("Rejecting withdrawal with negative net {:.2}", net);
            Err(CalcError::NegativeNetWithdrawal(net))
        }
        NegativeNetPolicy::Clamp => Ok(0.0),
        NegativeNetPolicy::Allow => Ok(net),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_with_net(net: f64) -> WithdrawalQuote {
        WithdrawalQuote {
            principal: 100.0,
            rental_yield_earned: 0.0,
            holding_year: 1,
            is_matured: false,
            penalty_percentage_applied: 100.0,
            penalty_amount: 100.0,
            total_amount: 100.0,
            management_fee_amount: 0.0,
            net_withdrawal_amount: net,
        }
    }

    #[test]
    fn test_positive_net_passes_through() {
        let q = quote_with_net(42.0);
        for policy in [NegativeNetPolicy::Reject, NegativeNetPolicy::Clamp, NegativeNetPolicy::Allow] {
            assert_eq!(payable_amount(&q, policy).unwrap(), 42.0);
        }
    }

    #[test]
    fn test_negative_net_policies() {
        let q = quote_with_net(-5.0);
        assert!(matches!(
            payable_amount(&q, NegativeNetPolicy::Reject),
            Err(CalcError::NegativeNetWithdrawal(n)) if n == -5.0
        ));
        assert_eq!(payable_amount(&q, NegativeNetPolicy::Clamp).unwrap(), 0.0);
        assert_eq!(payable_amount(&q, NegativeNetPolicy::Allow).unwrap(), -5.0);
    }

    #[test]
    fn test_default_is_reject() {
        assert_eq!(NegativeNetPolicy::default(), NegativeNetPolicy::Reject);
    }
}
