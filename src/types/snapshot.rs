use super::{BotState, PredictionRecord};
use serde::{Deserialize, Serialize};

/// Full state of the tracker at a point in time. This is the payload served
/// over both the REST API and the WebSocket stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    pub bot: BotState,
    /// Prediction log, newest first, capped at the retention limit.
    pub predictions: Vec<PredictionRecord>,
    /// Cumulative score from settled predictions.
    pub score: i64,
    pub live_price: Option<f64>,
    pub previous_price: Option<f64>,
    pub feed_connected: bool,
    /// Close time of the most recent candle in the history window.
    pub last_candle_time: Option<i64>,
    /// Millisecond timestamp of the event that produced this snapshot.
    pub updated_at: i64,
}
