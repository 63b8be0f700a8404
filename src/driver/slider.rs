use crate::driver::domain::{PriceDomain, SAMPLE_COUNT};
use crate::driver::summary;
use crate::payoff::keypoints::{Comparison, Verdict};
use crate::state::Scenario;

/// Range and step of the price control. Mirrors the plotted domain, with the
/// step splitting it into `SAMPLE_COUNT` increments.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PriceSlider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl PriceSlider {
    pub fn from_domain(domain: &PriceDomain) -> Self {
        Self {
            min: domain.lower,
            max: domain.upper,
            step: domain.width() / SAMPLE_COUNT as f64,
        }
    }

    /// Clamp a raw control value into range and snap it onto the step grid.
    /// Returns `None` for non-finite input.
    pub fn constrain(&self, raw: f64) -> Option<f64> {
        if !raw.is_finite() {
            return None;
        }
        if self.step <= 0.0 || !self.step.is_finite() {
            return Some(self.min);
        }
        let clamped = raw.clamp(self.min, self.max);
        let snapped = self.min + ((clamped - self.min) / self.step).round() * self.step;
        Some(snapped.clamp(self.min, self.max))
    }
}

/// What a chart must redraw after the evaluation price changes.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DisplayUpdate {
    pub price: f64,
    pub covered_call_profit: f64,
    pub buy_and_hold_profit: f64,
    pub difference: f64,
    pub verdict: Verdict,
    pub summary: String,
}

impl DisplayUpdate {
    /// Pure: derived values for `price`, no state involved.
    pub fn evaluate(scenario: &Scenario, price: f64) -> Self {
        let cmp = Comparison::at(scenario, price);
        Self {
            price,
            covered_call_profit: cmp.covered_call,
            buy_and_hold_profit: cmp.buy_and_hold,
            difference: cmp.difference,
            verdict: cmp.verdict,
            summary: summary::summary_text(&cmp),
        }
    }
}

/// The single piece of mutable state in the interactive variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderState {
    pub scenario: Scenario,
    pub slider: PriceSlider,
    pub current_price: f64,
}

impl SliderState {
    /// Starts at the user's raw initial price, which may lie outside the
    /// slider range; only values coming from the control are constrained.
    pub fn new(scenario: Scenario, slider: PriceSlider) -> Self {
        Self {
            scenario,
            slider,
            current_price: scenario.evaluation_price,
        }
    }

    pub fn current(&self) -> DisplayUpdate {
        DisplayUpdate::evaluate(&self.scenario, self.current_price)
    }

    /// Change handler invoked by the hosting UI with the new evaluation price.
    pub fn on_value_changed(&mut self, new_price: f64) -> DisplayUpdate {
        self.current_price = new_price;
        self.current()
    }

    /// Raw control input: constrained onto the slider grid first.
    /// Non-finite input leaves the state untouched.
    pub fn on_slider_input(&mut self, raw: f64) -> Option<DisplayUpdate> {
        let price = self.slider.constrain(raw)?;
        Some(self.on_value_changed(price))
    }
}
