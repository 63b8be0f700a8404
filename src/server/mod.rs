pub mod routes;
pub mod ws;

use crate::state::AppState;
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(routes::index))
        .route("/api/figure", axum::routing::get(routes::get_figure))
        .route("/api/scenario", axum::routing::get(routes::get_scenario))
        .route("/api/evaluate", axum::routing::get(routes::get_evaluate))
        .route("/api/counters", axum::routing::get(routes::get_counters))
        .route("/ws", axum::routing::get(ws::ws_handler))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}
