use crate::driver::domain::{PriceDomain, ProfitCurve};
use crate::driver::slider::DisplayUpdate;
use crate::driver::summary::format_currency;
use crate::errors::{AppError, AppResult};
use crate::payoff::keypoints::KeyPoints;
use crate::payoff::{BuyAndHold, CoveredCall, PayoffModel};
use crate::state::Scenario;
use plotly::common::{Anchor, DashType, Font, Line, Marker, MarkerSymbol, Mode, Title};
use plotly::layout::{Annotation, Axis, Legend, Margin};
use plotly::{Layout, Plot, Scatter};
use std::path::Path;

pub const TITLE: &str = "Covered Call vs Buy & Hold: Profit at Expiration";

// Trace order is part of the dashboard contract: the page restyles the two
// evaluation markers by index.
#[cfg(test)]
pub const TRACE_COVERED_CALL: usize = 0;
#[cfg(test)]
pub const TRACE_BUY_AND_HOLD: usize = 1;
pub const TRACE_CC_MARKER: usize = 7;
pub const TRACE_BH_MARKER: usize = 8;
#[cfg(test)]
pub const TRACE_COUNT: usize = 9;

/// Everything needed to draw one payoff chart.
pub struct FigureSpec<'a> {
    pub scenario: &'a Scenario,
    pub domain: PriceDomain,
    pub font_family: &'a str,
    /// Evaluation point markers.
    pub evaluation: Option<&'a DisplayUpdate>,
    /// Draw the summary text inside the chart (static variant).
    pub summary_box: bool,
}

pub fn payoff_figure(spec: &FigureSpec<'_>) -> Plot {
    let scenario = spec.scenario;
    let cc = CoveredCall::new(scenario);
    let bh = BuyAndHold::new(scenario);
    let models: [&dyn PayoffModel; 2] = [&cc, &bh];
    let curve = ProfitCurve::sample(&spec.domain, &models);
    let key_points = KeyPoints::derive(scenario);
    let (y_lo, y_hi) = profit_range(&curve, &key_points);
    let purchase = scenario.position.purchase_price;

    let mut plot = Plot::new();

    let profits_of = |model: &dyn PayoffModel| {
        curve
            .series(model.name())
            .map(|s| s.profits.clone())
            .unwrap_or_default()
    };
    let cc_profits = profits_of(&cc);
    let bh_profits = profits_of(&bh);

    plot.add_trace(
        Scatter::new(curve.prices.clone(), cc_profits)
            .name("Covered Call")
            .mode(Mode::Lines)
            .line(Line::new().color("blue").width(2.0)),
    );
    plot.add_trace(
        Scatter::new(curve.prices.clone(), bh_profits)
            .name("Buy & Hold")
            .mode(Mode::Lines)
            .line(Line::new().color("orange").width(2.0).dash(DashType::Dash)),
    );
    plot.add_trace(
        Scatter::new(vec![spec.domain.lower, spec.domain.upper], vec![0.0, 0.0])
            .name("zero")
            .mode(Mode::Lines)
            .line(Line::new().color("black").width(0.7))
            .show_legend(false)
            .hover_info(plotly::common::HoverInfo::Skip),
    );
    plot.add_trace(
        Scatter::new(vec![purchase, purchase], vec![y_lo, y_hi])
            .name(format!("Purchase price: ${purchase:.2}"))
            .mode(Mode::Lines)
            .line(Line::new().color("red").dash(DashType::Dot)),
    );
    plot.add_trace(
        Scatter::new(vec![key_points.max_profit.price], vec![key_points.max_profit.profit])
            .name("Max profit (at strike)")
            .mode(Mode::Markers)
            .marker(Marker::new().color("green").size(10)),
    );
    plot.add_trace(
        Scatter::new(vec![key_points.crossover.price], vec![key_points.crossover.profit])
            .name("Strategy crossover")
            .mode(Mode::Markers)
            .marker(Marker::new().color("magenta").size(10)),
    );
    let crossover = key_points.crossover.price;
    plot.add_trace(
        Scatter::new(vec![crossover, crossover], vec![y_lo, y_hi])
            .name(format!("Crossover price: ${crossover:.2}"))
            .mode(Mode::Lines)
            .line(Line::new().color("magenta").dash(DashType::Dot)),
    );

    let (cc_x, cc_y, bh_y) = match spec.evaluation {
        Some(u) => (vec![u.price], vec![u.covered_call_profit], vec![u.buy_and_hold_profit]),
        None => (Vec::new(), Vec::new(), Vec::new()),
    };
    plot.add_trace(
        Scatter::new(cc_x.clone(), cc_y)
            .name("Covered Call at price")
            .mode(Mode::Markers)
            .marker(Marker::new().color("blue").size(15).symbol(MarkerSymbol::Star))
            .show_legend(false),
    );
    plot.add_trace(
        Scatter::new(cc_x, bh_y)
            .name("Buy & Hold at price")
            .mode(Mode::Markers)
            .marker(Marker::new().color("orange").size(10))
            .show_legend(false),
    );

    let mut annotations = vec![
        Annotation::new()
            .text(format!("Max profit: {}", format_currency(key_points.max_profit.profit)))
            .x(key_points.max_profit.price)
            .y(key_points.max_profit.profit)
            .ax(-70.0)
            .ay(40.0)
            .show_arrow(true)
            .arrow_color("green")
            .background_color("rgba(255,255,0,0.7)")
            .border_color("black")
            .font(Font::new().size(11)),
        Annotation::new()
            .text(format!("Price > ${crossover:.2}<br>holding shares earns more"))
            .x(crossover)
            .y(key_points.crossover.profit)
            .ax(0.0)
            .ay(70.0)
            .show_arrow(true)
            .arrow_color("magenta")
            .background_color("rgba(255,0,255,0.3)")
            .border_color("black")
            .font(Font::new().size(11)),
    ];

    if spec.summary_box {
        if let Some(update) = spec.evaluation {
            annotations.push(
                Annotation::new()
                    .text(update.summary.replace('\n', "<br>"))
                    .x_ref("paper")
                    .y_ref("paper")
                    .x(0.01)
                    .y(0.99)
                    .x_anchor(Anchor::Left)
                    .y_anchor(Anchor::Top)
                    .show_arrow(false)
                    .background_color("aliceblue")
                    .border_color("steelblue")
                    .border_pad(6.0)
                    .font(Font::new().size(12)),
            );
        }
    }

    plot.set_layout(
        Layout::new()
            .title(Title::from(TITLE))
            .font(Font::new().family(spec.font_family))
            .height(800)
            .margin(Margin::new().left(80).right(30).top(80).bottom(60))
            .x_axis(
                Axis::new()
                    .title(Title::from("Stock price at expiration ($)"))
                    .range(vec![spec.domain.lower, spec.domain.upper])
                    .show_grid(true),
            )
            .y_axis(
                Axis::new()
                    .title(Title::from(
                        format!(
                            "Total profit/loss on {} shares ($)",
                            scenario.position.num_shares
                        )
                        .as_str(),
                    ))
                    .show_grid(true),
            )
            .legend(
                Legend::new()
                    .x(0.99)
                    .y(0.01)
                    .x_anchor(Anchor::Right)
                    .y_anchor(Anchor::Bottom),
            )
            .annotations(annotations),
    );

    plot
}

/// Lowest and highest profit worth showing, padded so vertical guide lines
/// never collapse to a point.
fn profit_range(curve: &ProfitCurve, key_points: &KeyPoints) -> (f64, f64) {
    let values = curve
        .series
        .iter()
        .flat_map(|s| s.profits.iter().copied())
        .chain(key_points.all().into_iter().map(|kp| kp.profit));

    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1.0);
    (lo - pad, hi + pad)
}

/// Writes a self-contained HTML chart (plotly.js is embedded from the CDN).
pub fn write_chart(plot: &Plot, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::Render(format!("creating {}: {e}", parent.display())))?;
    }
    std::fs::write(path, plot.to_html())
        .map_err(|e| AppError::Render(format!("writing {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::keypoints::tests::sample_scenario;
    use crate::state::Variant;
    use approx::assert_relative_eq;

    fn figure_json(summary_box: bool) -> serde_json::Value {
        let scenario = sample_scenario();
        let update = DisplayUpdate::evaluate(&scenario, scenario.evaluation_price);
        let plot = payoff_figure(&FigureSpec {
            scenario: &scenario,
            domain: PriceDomain::for_variant(Variant::Static, &scenario),
            font_family: "sans-serif",
            evaluation: Some(&update),
            summary_box,
        });
        serde_json::from_str(&plot.to_json()).unwrap()
    }

    #[test]
    fn test_trace_inventory() {
        let fig = figure_json(false);
        let data = fig["data"].as_array().unwrap();
        assert_eq!(data.len(), TRACE_COUNT);
        assert_eq!(data[TRACE_COVERED_CALL]["name"], "Covered Call");
        assert_eq!(data[TRACE_BUY_AND_HOLD]["name"], "Buy & Hold");
        assert_eq!(data[TRACE_COVERED_CALL]["x"].as_array().unwrap().len(), 400);
        assert_eq!(data[TRACE_CC_MARKER]["x"][0], 105.0);
        assert_eq!(data[TRACE_CC_MARKER]["y"][0], 700.0);
        assert_eq!(data[TRACE_BH_MARKER]["y"][0], 500.0);
        assert_eq!(data[3]["name"], "Purchase price: $100.00");
        assert_eq!(data[6]["name"], "Crossover price: $112.00");
    }

    #[test]
    fn test_layout_labels_and_annotations() {
        let fig = figure_json(false);
        let layout = &fig["layout"];
        let annotations = layout["annotations"].as_array().unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0]["text"], "Max profit: $1,200.00");
        assert!(annotations[1]["text"].as_str().unwrap().starts_with("Price > $112.00"));
        assert_eq!(layout["font"]["family"], "sans-serif");
        let fig = figure_json(true);
        let annotations = fig["layout"]["annotations"].as_array().unwrap();
        assert_eq!(annotations.len(), 3);
        assert!(annotations[2]["text"].as_str().unwrap().contains("$200.00 more"));
    }

    #[test]
    fn test_write_chart_creates_file() {
        let scenario = sample_scenario();
        let plot = payoff_figure(&FigureSpec {
            scenario: &scenario,
            domain: PriceDomain::for_variant(Variant::Static, &scenario),
            font_family: "sans-serif",
            evaluation: None,
            summary_box: true,
        });
        let dir = std::env::temp_dir().join(format!("covercall-chart-{}", std::process::id()));
        let path = dir.join("covered_call_profit.html");
        write_chart(&plot, &path).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("Covered Call"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_profit_range_is_padded() {
        let scenario = sample_scenario();
        let domain = PriceDomain::for_variant(Variant::Static, &scenario);
        let cc = CoveredCall::new(&scenario);
        let bh = BuyAndHold::new(&scenario);
        let curve = ProfitCurve::sample(&domain, &[&cc, &bh]);
        let (lo, hi) = profit_range(&curve, &KeyPoints::derive(&scenario));
        // Raw range is -3000 (holding at $70) to 4000 (holding at $140); 5% pad.
        assert_relative_eq!(lo, -3350.0, epsilon = 1e-9);
        assert_relative_eq!(hi, 4350.0, epsilon = 1e-9);
    }

    #[test]
    fn test_curves_are_looked_up_by_strategy_name() {
        let fig = figure_json(false);
        let data = fig["data"].as_array().unwrap();
        let cc = data[TRACE_COVERED_CALL]["y"].as_array().unwrap();
        let bh = data[TRACE_BUY_AND_HOLD]["y"].as_array().unwrap();
        assert_eq!(cc.len(), 400);
        assert_eq!(bh.len(), 400);
        // At $70: covered call keeps the premium, buy & hold does not.
        assert_eq!(cc[0], -2800.0);
        assert_eq!(bh[0], -3000.0);
        assert_eq!(bh[399], 4000.0);
    }
}
