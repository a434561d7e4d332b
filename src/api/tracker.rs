//! Tracker API endpoints serving engine snapshots.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::types::{PredictionRecord, TrackerSnapshot};
use crate::AppState;

/// Prediction log payload with the running score.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictionsResponse {
    predictions: Vec<PredictionRecord>,
    score: i64,
    timestamp: i64,
}

/// Create the tracker router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_snapshot))
        .route("/predictions", get(get_predictions))
}

/// Get the full tracker snapshot.
async fn get_snapshot(State(state): State<AppState>) -> Json<TrackerSnapshot> {
    let snapshot = state.snapshots.borrow().clone();
    Json(snapshot)
}

/// Get the prediction log and current score.
async fn get_predictions(State(state): State<AppState>) -> Json<PredictionsResponse> {
    let snapshot = state.snapshots.borrow().clone();

    Json(PredictionsResponse {
        predictions: snapshot.predictions,
        score: snapshot.score,
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}
