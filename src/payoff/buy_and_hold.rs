use crate::payoff::PayoffModel;
use crate::state::Scenario;

/// Profit of simply holding the shares to expiration.
#[inline]
pub fn buy_and_hold_profit(expiration_price: f64, purchase_price: f64, num_shares: f64) -> f64 {
    (expiration_price - purchase_price) * num_shares
}

#[derive(Debug, Clone, Copy)]
pub struct BuyAndHold {
    purchase_price: f64,
    num_shares: f64,
}

impl BuyAndHold {
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            purchase_price: scenario.position.purchase_price,
            num_shares: scenario.num_shares_f64(),
        }
    }
}

impl PayoffModel for BuyAndHold {
    #[inline]
    fn name(&self) -> &'static str {
        "Buy & Hold"
    }

    #[inline]
    fn profit(&self, expiration_price: f64) -> f64 {
        buy_and_hold_profit(expiration_price, self.purchase_price, self.num_shares)
    }
}
