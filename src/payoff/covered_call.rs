use crate::payoff::PayoffModel;
use crate::state::Scenario;

/// Profit of long stock plus one short call per 100 shares, held to expiration.
///
/// Below or at the strike the shares are kept and carry full price exposure.
/// Above the strike they are called away, so the stock leg is capped at
/// `(strike - purchase) * shares`. The premium is kept either way.
///
/// No validation: negative or zero prices pass straight through.
#[inline]
pub fn covered_call_profit(
    expiration_price: f64,
    purchase_price: f64,
    strike_price: f64,
    premium_per_share: f64,
    num_shares: f64,
) -> f64 {
    let total_premium = premium_per_share * num_shares;
    let stock_profit = if expiration_price <= strike_price {
        (expiration_price - purchase_price) * num_shares
    } else {
        (strike_price - purchase_price) * num_shares
    };
    stock_profit + total_premium
}

/// Covered call bound to a scenario.
#[derive(Debug, Clone, Copy)]
pub struct CoveredCall {
    purchase_price: f64,
    strike_price: f64,
    premium_per_share: f64,
    num_shares: f64,
}

impl CoveredCall {
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            purchase_price: scenario.position.purchase_price,
            strike_price: scenario.call.strike_price,
            premium_per_share: scenario.call.premium_per_share,
            num_shares: scenario.num_shares_f64(),
        }
    }
}

impl PayoffModel for CoveredCall {
    #[inline]
    fn name(&self) -> &'static str {
        "Covered Call"
    }

    #[inline]
    fn profit(&self, expiration_price: f64) -> f64 {
        covered_call_profit(
            expiration_price,
            self.purchase_price,
            self.strike_price,
            self.premium_per_share,
            self.num_shares,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_below_strike_keeps_full_exposure() {
        // (105 - 100) * 100 + 2 * 100
        assert_relative_eq!(covered_call_profit(105.0, 100.0, 110.0, 2.0, 100.0), 700.0);
        for p in [50.0, 80.0, 99.5, 100.0, 109.99] {
            let expected = (p - 100.0) * 100.0 + 200.0;
            assert_relative_eq!(covered_call_profit(p, 100.0, 110.0, 2.0, 100.0), expected);
        }
    }

    #[test]
    fn test_above_strike_is_capped() {
        assert_relative_eq!(covered_call_profit(130.0, 100.0, 110.0, 2.0, 100.0), 1200.0);
        for p in [110.01, 115.0, 250.0, 1e6] {
            assert_relative_eq!(covered_call_profit(p, 100.0, 110.0, 2.0, 100.0), 1200.0);
        }
    }

    #[test]
    fn test_continuous_at_strike() {
        let at = covered_call_profit(110.0, 100.0, 110.0, 2.0, 100.0);
        let just_below = covered_call_profit(110.0 - 1e-9, 100.0, 110.0, 2.0, 100.0);
        let just_above = covered_call_profit(110.0 + 1e-9, 100.0, 110.0, 2.0, 100.0);
        assert!((at - just_below).abs() < 1e-6);
        assert!((at - just_above).abs() < 1e-6);
    }

    #[test]
    fn test_strike_below_purchase_locks_in_loss() {
        // Shares bought at 100, called away at 90, 3 premium: -7 per share.
        assert_relative_eq!(covered_call_profit(120.0, 100.0, 90.0, 3.0, 200.0), -1400.0);
    }

    #[test]
    fn test_accepts_negative_inputs() {
        let p = covered_call_profit(-10.0, 100.0, 110.0, 2.0, 100.0);
        assert_relative_eq!(p, (-10.0 - 100.0) * 100.0 + 200.0);
    }

    #[test]
    fn test_model_matches_free_function() {
        let scenario = crate::payoff::keypoints::tests::sample_scenario();
        let model = CoveredCall::new(&scenario);
        assert_eq!(model.name(), "Covered Call");
        assert_relative_eq!(model.profit(105.0), 700.0);
        assert_relative_eq!(model.profit(130.0), 1200.0);
    }
}
