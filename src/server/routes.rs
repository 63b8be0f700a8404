use crate::chart::dashboard::DASHBOARD_HTML;
use crate::chart::figure::{TRACE_BH_MARKER, TRACE_CC_MARKER};
use crate::driver::slider::DisplayUpdate;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json};
use portable_atomic::Ordering::Relaxed;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct EvaluateQuery {
    pub price: f64,
}

/// GET / -- dashboard page
pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// GET /api/figure -- plotly figure, serialized once at startup
pub async fn get_figure(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.figure_json.clone(),
    )
}

/// GET /api/scenario -- inputs, plotted range, slider and key points
pub async fn get_scenario(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "mode": state.config.variant,
        "scenario": state.scenario,
        "domain": state.domain,
        "slider": state.slider,
        "key_points": state.key_points,
        "traces": {
            "cc_marker": TRACE_CC_MARKER,
            "bh_marker": TRACE_BH_MARKER,
        },
        "started_at": state.started_at.to_rfc3339(),
    }))
}

/// GET /api/evaluate?price=P -- stateless evaluation at a slider-constrained price
pub async fn get_evaluate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EvaluateQuery>,
) -> Result<Json<DisplayUpdate>, (StatusCode, Json<serde_json::Value>)> {
    let Some(price) = state.slider.constrain(params.price) else {
        state.counters.rejected_messages.fetch_add(1, Relaxed);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "price must be a finite number" })),
        ));
    };
    let update = DisplayUpdate::evaluate(&state.scenario, price);
    state.record_update();
    Ok(Json(update))
}

/// GET /api/counters -- lock-free counters
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "updates_computed": state.counters.updates_computed.load(Relaxed),
        "ws_connections": state.counters.ws_connections.load(Relaxed),
        "ws_messages_sent": state.counters.ws_messages_sent.load(Relaxed),
        "rejected_messages": state.counters.rejected_messages.load(Relaxed),
    }))
}
