pub mod buy_and_hold;
pub mod covered_call;
pub mod keypoints;

pub use buy_and_hold::{buy_and_hold_profit, BuyAndHold};
pub use covered_call::{covered_call_profit, CoveredCall};

/// A strategy whose profit at expiration depends only on the expiration price.
/// `profit()` must be a pure function of its input and the bound scenario.
pub trait PayoffModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Total profit/loss in currency units for the whole position.
    fn profit(&self, expiration_price: f64) -> f64;
}
