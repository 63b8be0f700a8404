use crate::payoff::keypoints::KeyPoints;
use crate::payoff::PayoffModel;
use crate::state::{Scenario, Variant};

/// Number of prices sampled across the plotted range.
pub const SAMPLE_COUNT: usize = 400;

/// Margin added on both sides of the static chart, in currency units.
const STATIC_MARGIN: f64 = 30.0;

/// Plotted price range. The bounds are a viewing heuristic only and may clip
/// key points for extreme inputs.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PriceDomain {
    pub lower: f64,
    pub upper: f64,
    pub samples: usize,
}

impl PriceDomain {
    pub fn for_variant(variant: Variant, scenario: &Scenario) -> Self {
        let purchase = scenario.position.purchase_price;
        let strike = scenario.call.strike_price;
        let premium = scenario.call.premium_per_share;

        let (lower, upper) = match variant {
            Variant::Interactive => (purchase.min(strike) * 0.8, (strike + premium) * 1.2),
            Variant::Static => (
                purchase.min(strike) - STATIC_MARGIN,
                purchase.max(strike) + STATIC_MARGIN,
            ),
        };

        Self {
            lower,
            upper,
            samples: SAMPLE_COUNT,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Logs every key point the bounds leave out of view. Returns how many.
    pub fn warn_if_clipping(&self, key_points: &KeyPoints) -> usize {
        let clipped = key_points.outside(self.lower, self.upper);
        for kp in &clipped {
            tracing::warn!(
                point = kp.label,
                price = kp.price,
                lower = self.lower,
                upper = self.upper,
                "key point outside the plotted range"
            );
        }
        clipped.len()
    }

    /// Evenly spaced prices, both endpoints included.
    pub fn prices(&self) -> Vec<f64> {
        match self.samples {
            0 => Vec::new(),
            1 => vec![self.lower],
            n => {
                let step = self.width() / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.upper
                        } else {
                            self.lower + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }
}

/// One sampled payoff series per strategy over a common price grid.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProfitCurve {
    pub prices: Vec<f64>,
    pub series: Vec<CurveSeries>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CurveSeries {
    pub name: &'static str,
    pub profits: Vec<f64>,
}

impl ProfitCurve {
    pub fn sample(domain: &PriceDomain, models: &[&dyn PayoffModel]) -> Self {
        let prices = domain.prices();
        let series = models
            .iter()
            .map(|m| CurveSeries {
                name: m.name(),
                profits: prices.iter().map(|&p| m.profit(p)).collect(),
            })
            .collect();
        Self { prices, series }
    }

    pub fn series(&self, name: &str) -> Option<&CurveSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}
