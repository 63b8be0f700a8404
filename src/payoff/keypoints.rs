use crate::payoff::{buy_and_hold_profit, covered_call_profit};
use crate::state::Scenario;
use smallvec::SmallVec;

/// Differences smaller than this (in currency units) count as a tie.
pub const EVEN_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct KeyPoint {
    pub label: &'static str,
    pub price: f64,
    pub profit: f64,
}

/// Annotated points of the covered-call payoff.
///
/// - max profit sits exactly at the strike: the payoff rises up to it and is
///   flat above it.
/// - crossover is `strike + premium`, where buy-and-hold catches the capped
///   covered-call return and pulls ahead for every higher price.
/// - breakeven is `purchase - premium`, where the covered call returns zero.
///   It only exists while that price is still at or below the strike.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct KeyPoints {
    pub max_profit: KeyPoint,
    pub crossover: KeyPoint,
    pub breakeven: Option<KeyPoint>,
}

impl KeyPoints {
    pub fn derive(scenario: &Scenario) -> Self {
        let purchase = scenario.position.purchase_price;
        let strike = scenario.call.strike_price;
        let premium = scenario.call.premium_per_share;
        let shares = scenario.num_shares_f64();

        let max_profit = KeyPoint {
            label: "max profit",
            price: strike,
            profit: covered_call_profit(strike, purchase, strike, premium, shares),
        };

        let crossover_price = strike + premium;
        let crossover = KeyPoint {
            label: "crossover",
            price: crossover_price,
            profit: buy_and_hold_profit(crossover_price, purchase, shares),
        };

        let breakeven_price = purchase - premium;
        let breakeven = (breakeven_price <= strike).then(|| KeyPoint {
            label: "breakeven",
            price: breakeven_price,
            profit: 0.0,
        });

        Self {
            max_profit,
            crossover,
            breakeven,
        }
    }

    pub fn all(&self) -> SmallVec<[KeyPoint; 3]> {
        let mut points = SmallVec::new();
        points.push(self.max_profit);
        points.push(self.crossover);
        if let Some(b) = self.breakeven {
            points.push(b);
        }
        points
    }

    /// Key points whose price falls outside `[lower, upper]`.
    pub fn outside(&self, lower: f64, upper: f64) -> SmallVec<[KeyPoint; 3]> {
        self.all()
            .into_iter()
            .filter(|kp| kp.price < lower || kp.price > upper)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    CoveredCallAhead,
    BuyAndHoldAhead,
    Even,
    /// The difference is NaN, so neither strategy can be said to lead.
    Undefined,
}

/// Both strategies evaluated at one expiration price.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Comparison {
    pub price: f64,
    pub covered_call: f64,
    pub buy_and_hold: f64,
    /// covered_call - buy_and_hold
    pub difference: f64,
    pub verdict: Verdict,
}

impl Comparison {
    pub fn at(scenario: &Scenario, price: f64) -> Self {
        let purchase = scenario.position.purchase_price;
        let shares = scenario.num_shares_f64();
        let covered_call = covered_call_profit(
            price,
            purchase,
            scenario.call.strike_price,
            scenario.call.premium_per_share,
            shares,
        );
        let buy_and_hold = buy_and_hold_profit(price, purchase, shares);
        let difference = covered_call - buy_and_hold;

        let verdict = if difference.is_nan() {
            Verdict::Undefined
        } else if difference.abs() < EVEN_TOLERANCE {
            Verdict::Even
        } else if difference > 0.0 {
            Verdict::CoveredCallAhead
        } else {
            Verdict::BuyAndHoldAhead
        };

        Self {
            price,
            covered_call,
            buy_and_hold,
            difference,
            verdict,
        }
    }
}
