use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    symbol: String,
    engine_ready: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let engine_ready = state.snapshots.borrow().bot.is_ready;

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        symbol: state.config.symbol.clone(),
        engine_ready,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
