mod chart;
mod config;
mod driver;
mod errors;
mod input;
mod payoff;
mod server;
mod state;

use crate::chart::figure::{payoff_figure, write_chart, FigureSpec};
use crate::chart::font::{resolve_font, system_font_dirs, FALLBACK_FONT};
use crate::driver::domain::PriceDomain;
use crate::driver::slider::{DisplayUpdate, PriceSlider, SliderState};
use crate::driver::summary;
use crate::errors::{AppError, AppResult};
use crate::input::{collect_scenario, Prompter};
use crate::payoff::keypoints::{Comparison, KeyPoints};
use crate::state::{AppState, Scenario, Variant};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout belongs to the prompts and the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(mode = %cfg.variant, "covercall starting");

    if let Err(e) = run(cfg).await {
        tracing::error!(error = %e, "fatal");
        std::process::exit(1);
    }
}

async fn run(cfg: config::AppConfig) -> AppResult<()> {
    println!("--- Covered Call payoff analyzer ({}) ---", cfg.variant);

    // Console prompts block; keep them off the async workers.
    let variant = cfg.variant;
    let scenario = tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
        collect_scenario(&mut prompter, variant)
    })
    .await
    .map_err(|e| AppError::Io(format!("prompt task failed: {e}")))??;

    println!("{}", "-".repeat(30));

    let font = resolve_font(&cfg.chart_font, &system_font_dirs());
    if font.fell_back {
        println!(
            "\nNote: font '{}' was not found, chart text will use {FALLBACK_FONT}.",
            cfg.chart_font
        );
    }

    match variant {
        Variant::Static => run_static(&cfg, &scenario, &font.family),
        Variant::Interactive => run_interactive(cfg, scenario, &font.family).await,
    }
}

/// One evaluation: console report, chart file, optional browser window.
fn run_static(cfg: &config::AppConfig, scenario: &Scenario, font_family: &str) -> AppResult<()> {
    let domain = PriceDomain::for_variant(Variant::Static, scenario);
    let key_points = KeyPoints::derive(scenario);
    domain.warn_if_clipping(&key_points);

    let cmp = Comparison::at(scenario, scenario.evaluation_price);
    let update = DisplayUpdate::evaluate(scenario, scenario.evaluation_price);

    print!(
        "{}",
        summary::StaticReport {
            scenario,
            key_points: &key_points,
            domain: &domain,
            comparison: &cmp,
            generated_at: chrono::Local::now(),
        }
    );

    let plot = payoff_figure(&FigureSpec {
        scenario,
        domain,
        font_family,
        evaluation: Some(&update),
        summary_box: true,
    });
    write_chart(&plot, &cfg.chart_output)?;
    println!("\nChart saved to {}", cfg.chart_output.display());

    if cfg.open_browser {
        plot.show();
    }
    Ok(())
}

/// Serves the slider dashboard until Ctrl-C.
async fn run_interactive(
    cfg: config::AppConfig,
    scenario: Scenario,
    font_family: &str,
) -> AppResult<()> {
    println!("Building interactive chart...");

    let domain = PriceDomain::for_variant(Variant::Interactive, &scenario);
    domain.warn_if_clipping(&KeyPoints::derive(&scenario));

    let initial = SliderState::new(scenario, PriceSlider::from_domain(&domain)).current();
    let plot = payoff_figure(&FigureSpec {
        scenario: &scenario,
        domain,
        font_family,
        evaluation: Some(&initial),
        summary_box: false,
    });

    let addr = cfg.bind_addr();
    let app_state = AppState::new(cfg, scenario, plot.to_json());
    let app = server::router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Server(format!("bind {addr}: {e}")))?;

    tracing::info!("server listening on {addr}");
    println!("\n{}\n", initial.summary);
    println!("Open http://{addr} and drag the slider. Press Ctrl-C to quit.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    Ok(())
}
