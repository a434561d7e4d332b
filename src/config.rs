use std::env;

use crate::engine::rsi::DEFAULT_PERIOD;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Trading pair symbol tracked by the engine.
    pub symbol: String,
    /// Binance REST base URL for candle history.
    pub binance_rest_url: String,
    /// Binance WebSocket base URL for the live trade stream.
    pub binance_ws_url: String,
    /// Candle interval used for history fetches.
    pub kline_interval: String,
    /// Seconds between candle history refreshes.
    pub history_refresh_secs: u64,
    /// RSI lookback period.
    pub rsi_period: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            symbol: env::var("SYMBOL").unwrap_or_else(|_| "BTCUSDT".to_string()),
            binance_rest_url: env::var("BINANCE_REST_URL")
                .unwrap_or_else(|_| "https://api.binance.com/api/v3".to_string()),
            binance_ws_url: env::var("BINANCE_WS_URL")
                .unwrap_or_else(|_| "wss://stream.binance.com:9443/ws".to_string()),
            kline_interval: env::var("KLINE_INTERVAL").unwrap_or_else(|_| "1m".to_string()),
            history_refresh_secs: env::var("HISTORY_REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            rsi_period: env::var("RSI_PERIOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PERIOD),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
