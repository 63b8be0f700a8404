use crate::driver::domain::PriceDomain;
use crate::payoff::keypoints::{Comparison, KeyPoints, Verdict};
use crate::state::Scenario;
use std::fmt;

/// `$1,234.56`, with the sign after the dollar sign: `$-1,800.00`.
/// Non-finite amounts print as `n/a`, `$inf` or `$-inf`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "n/a".to_string();
    }
    if amount.is_infinite() {
        return if amount > 0.0 { "$inf" } else { "$-inf" }.to_string();
    }

    let rounded = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && rounded.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
        "-"
    } else {
        ""
    };
    format!("${sign}{grouped}.{frac_part}")
}

pub fn conclusion(cmp: &Comparison) -> String {
    match cmp.verdict {
        Verdict::Even => "Conclusion: both strategies return almost exactly the same.".to_string(),
        Verdict::CoveredCallAhead => format!(
            "Conclusion: Covered Call earns {} more than Buy & Hold.",
            format_currency(cmp.difference)
        ),
        Verdict::BuyAndHoldAhead => format!(
            "Conclusion: Covered Call earns {} less than Buy & Hold.",
            format_currency(cmp.difference.abs())
        ),
        Verdict::Undefined => {
            "Conclusion: the strategies cannot be compared at this price.".to_string()
        }
    }
}

/// Multi-line summary shown in the chart's text box.
pub fn summary_text(cmp: &Comparison) -> String {
    format!(
        "--- Profit analysis at expiration price ${:.2} ---\n\n\
         Strategy 1 (Covered Call) total profit: {}\n\
         Strategy 2 (Buy & Hold) total profit: {}\n\n\
         {}",
        cmp.price,
        format_currency(cmp.covered_call),
        format_currency(cmp.buy_and_hold),
        conclusion(cmp),
    )
}

/// Console report for the static variant.
pub struct StaticReport<'a> {
    pub scenario: &'a Scenario,
    pub key_points: &'a KeyPoints,
    pub domain: &'a PriceDomain,
    pub comparison: &'a Comparison,
    pub generated_at: chrono::DateTime<chrono::Local>,
}

impl fmt::Display for StaticReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = &self.scenario.position;
        let call = &self.scenario.call;
        let kp = self.key_points;

        writeln!(f, "=== Covered Call vs Buy & Hold ===")?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f)?;
        writeln!(f, "Purchase price:      ${:.2}", pos.purchase_price)?;
        writeln!(
            f,
            "Shares:              {} ({} contract{})",
            pos.num_shares,
            pos.contracts(),
            if pos.contracts() == 1 { "" } else { "s" }
        )?;
        writeln!(f, "Strike price:        ${:.2}", call.strike_price)?;
        writeln!(f, "Premium per share:   ${:.2}", call.premium_per_share)?;
        writeln!(
            f,
            "Total premium:       {}",
            format_currency(call.premium_per_share * self.scenario.num_shares_f64())
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Max profit:          {} at ${:.2}",
            format_currency(kp.max_profit.profit),
            kp.max_profit.price
        )?;
        writeln!(
            f,
            "Crossover price:     ${:.2} (holding shares earns more above it)",
            kp.crossover.price
        )?;
        match kp.breakeven {
            Some(be) => writeln!(f, "Breakeven price:     ${:.2}", be.price)?,
            None => writeln!(f, "Breakeven price:     none (loss even if called away)")?,
        }
        writeln!(
            f,
            "Chart range:         ${:.2} to ${:.2}",
            self.domain.lower, self.domain.upper
        )?;
        writeln!(f)?;
        writeln!(f, "{}", summary_text(self.comparison))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::keypoints::tests::sample_scenario;
    use crate::state::Variant;
    use chrono::TimeZone;

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(700.0), "$700.00");
        assert_eq!(format_currency(1200.0), "$1,200.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-1800.0), "$-1,800.00");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
    }

    #[test]
    fn test_currency_non_finite() {
        assert_eq!(format_currency(f64::NAN), "n/a");
        assert_eq!(format_currency(f64::INFINITY), "$inf");
        assert_eq!(format_currency(f64::NEG_INFINITY), "$-inf");
    }

    #[test]
    fn test_summary_for_nan_price() {
        let cmp = Comparison::at(&sample_scenario(), f64::NAN);
        let text = summary_text(&cmp);
        assert!(text.contains("Strategy 1 (Covered Call) total profit: n/a"));
        assert!(text.ends_with("Conclusion: the strategies cannot be compared at this price."));
        assert!(!text.contains("less than"));
    }

    #[test]
    fn test_summary_when_covered_call_ahead() {
        let cmp = Comparison::at(&sample_scenario(), 105.0);
        let text = summary_text(&cmp);
        assert_eq!(
            text,
            "--- Profit analysis at expiration price $105.00 ---\n\n\
             Strategy 1 (Covered Call) total profit: $700.00\n\
             Strategy 2 (Buy & Hold) total profit: $500.00\n\n\
             Conclusion: Covered Call earns $200.00 more than Buy & Hold."
        );
    }

    #[test]
    fn test_conclusion_variants() {
        let scenario = sample_scenario();
        let behind = Comparison::at(&scenario, 130.0);
        assert_eq!(
            conclusion(&behind),
            "Conclusion: Covered Call earns $1,800.00 less than Buy & Hold."
        );
        let even = Comparison::at(&scenario, 112.0);
        assert!(conclusion(&even).contains("same"));
    }

    #[test]
    fn test_static_report_lists_key_points() {
        let scenario = sample_scenario();
        let kp = KeyPoints::derive(&scenario);
        let domain = PriceDomain::for_variant(Variant::Static, &scenario);
        let cmp = Comparison::at(&scenario, scenario.evaluation_price);
        let when = chrono::Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let report = StaticReport {
            scenario: &scenario,
            key_points: &kp,
            domain: &domain,
            comparison: &cmp,
            generated_at: when,
        }
        .to_string();

        assert!(report.contains("Generated: 2024-03-01 09:30:00"));
        assert!(report.contains("100 (1 contract)"));
        assert!(report.contains("Total premium:       $200.00"));
        assert!(report.contains("Max profit:          $1,200.00 at $110.00"));
        assert!(report.contains("Crossover price:     $112.00"));
        assert!(report.contains("Breakeven price:     $98.00"));
        assert!(report.contains("Chart range:         $70.00 to $140.00"));
        assert!(report.ends_with("more than Buy & Hold.\n"));
    }

    #[test]
    fn test_static_report_without_breakeven() {
        let mut scenario = sample_scenario();
        scenario.position = crate::state::Position::from_contracts(100.0, 3);
        scenario.call.strike_price = 90.0;
        let kp = KeyPoints::derive(&scenario);
        assert!(kp.breakeven.is_none());
        let domain = PriceDomain::for_variant(Variant::Static, &scenario);
        let cmp = Comparison::at(&scenario, scenario.evaluation_price);
        let when = chrono::Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let report = format!(
            "{}",
            StaticReport {
                scenario: &scenario,
                key_points: &kp,
                domain: &domain,
                comparison: &cmp,
                generated_at: when,
            }
        );

        assert!(report.starts_with("=== Covered Call vs Buy & Hold ===\n"));
        assert!(report.contains("300 (3 contracts)"));
        assert!(report.contains("Total premium:       $600.00"));
        assert!(report.contains("Breakeven price:     none (loss even if called away)\n"));
        assert!(report.contains("Chart range:         $60.00 to $130.00"));
    }
}
