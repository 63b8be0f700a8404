use crate::config::AppConfig;
use crate::driver::domain::PriceDomain;
use crate::driver::slider::{DisplayUpdate, PriceSlider};
use crate::payoff::keypoints::KeyPoints;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One option contract covers this many shares.
pub const SHARES_PER_CONTRACT: u64 = 100;

// ── Run variant ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Slider-driven dashboard, runs until interrupted.
    Interactive,
    /// One evaluation point, console report and a chart file.
    Static,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interactive => write!(f, "interactive"),
            Self::Static => write!(f, "static"),
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interactive" | "slider" => Ok(Self::Interactive),
            "static" | "report" => Ok(Self::Static),
            other => Err(format!("unknown mode '{other}' (expected interactive or static)")),
        }
    }
}

// ── Scenario inputs ──

/// Long stock position. `num_shares` is always a whole number of contracts.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Position {
    pub purchase_price: f64,
    pub num_shares: u64,
}

impl Position {
    pub fn from_contracts(purchase_price: f64, contracts: u32) -> Self {
        Self {
            purchase_price,
            num_shares: u64::from(contracts) * SHARES_PER_CONTRACT,
        }
    }

    #[inline]
    pub fn contracts(&self) -> u64 {
        self.num_shares / SHARES_PER_CONTRACT
    }
}

/// The short call written against the position.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OptionLeg {
    pub strike_price: f64,
    pub premium_per_share: f64,
}

/// Everything collected from the console for one run.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Scenario {
    pub position: Position,
    pub call: OptionLeg,
    /// Initial slider price (interactive) or the single evaluation price (static).
    pub evaluation_price: f64,
}

impl Scenario {
    #[inline]
    pub fn num_shares_f64(&self) -> f64 {
        self.position.num_shares as f64
    }
}

// ── WebSocket protocol ──

/// Messages sent to dashboard clients.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum WsMessage {
    #[serde(rename = "display_update")]
    DisplayUpdate(DisplayUpdate),

    #[serde(rename = "error")]
    Error { reason: String },
}

/// Messages received from dashboard clients.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "price_changed")]
    PriceChanged { price: f64 },
}

// ── Counters (lock-free) ──

pub struct PerfCounters {
    pub updates_computed: AtomicU64,
    pub ws_connections: AtomicU64,
    pub ws_messages_sent: AtomicU64,
    pub rejected_messages: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            updates_computed: AtomicU64::new(0),
            ws_connections: AtomicU64::new(0),
            ws_messages_sent: AtomicU64::new(0),
            rejected_messages: AtomicU64::new(0),
        }
    }
}

// ── Dashboard shared state (immutable after startup) ──

pub struct AppState {
    pub config: AppConfig,
    pub scenario: Scenario,
    pub domain: PriceDomain,
    pub slider: PriceSlider,
    pub key_points: KeyPoints,
    /// Plotly figure, serialized once at startup.
    pub figure_json: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig, scenario: Scenario, figure_json: String) -> Arc<Self> {
        let domain = PriceDomain::for_variant(Variant::Interactive, &scenario);
        Arc::new(Self {
            config,
            scenario,
            slider: PriceSlider::from_domain(&domain),
            domain,
            key_points: KeyPoints::derive(&scenario),
            figure_json,
            started_at: chrono::Utc::now(),
            counters: PerfCounters::new(),
        })
    }

    #[inline]
    pub fn record_update(&self) {
        self.counters.updates_computed.fetch_add(1, Ordering::Relaxed);
    }
}
