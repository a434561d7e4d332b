//! Seer - Real-time BTC momentum signal engine with scored prediction tracking

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod sources;
pub mod types;
pub mod websocket;

use std::sync::Arc;

use tokio::sync::watch;

use config::Config;
use types::TrackerSnapshot;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Receiver side of the engine's snapshot channel.
    pub snapshots: watch::Receiver<TrackerSnapshot>,
}

// Re-export commonly used types
pub use types::*;
