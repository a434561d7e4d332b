use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::engine::history::WINDOW_SIZE;
use crate::engine::EngineEvent;
use crate::error::{truncate_chars, FeedError, Result};

/// One kline from the Binance REST API. The wire format is a 12-element
/// array: open time, OHLCV as strings, close time, quote volume, trade
/// count, taker volumes, and an ignored field.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct BinanceKline(
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    i64,
    String,
    String,
    String,
);

impl BinanceKline {
    /// Close time of the interval, marking when the candle completed.
    pub fn close_time(&self) -> i64 {
        self.6
    }

    /// Close price parsed from its string field. Non-numeric, non-finite,
    /// and non-positive values are dropped.
    pub fn close_price(&self) -> Option<f64> {
        self.4
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// Polls the Binance REST API for candle history and feeds refresh events
/// into the engine.
pub struct KlineHistoryClient {
    client: Client,
    base_url: String,
    symbol: String,
    interval: String,
    limit: usize,
    refresh_secs: u64,
    events: mpsc::Sender<EngineEvent>,
}

impl KlineHistoryClient {
    pub fn new(config: &Config, events: mpsc::Sender<EngineEvent>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Seer/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.binance_rest_url.clone(),
            symbol: config.symbol.clone(),
            interval: config.kline_interval.clone(),
            limit: WINDOW_SIZE,
            refresh_secs: config.history_refresh_secs,
            events,
        }
    }

    /// Fetch immediately, then refresh on the configured interval until
    /// shutdown.
    pub async fn start_polling(self, shutdown: CancellationToken) {
        info!("Starting candle history polling for {}", self.symbol);

        loop {
            if let Err(e) = self.refresh_once().await {
                error!("History fetch error: {}", e);
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_secs(self.refresh_secs)) => {}
            }
        }

        info!("Candle history polling stopped");
    }

    async fn refresh_once(&self) -> Result<()> {
        let url = format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            self.base_url, self.symbol, self.interval, self.limit
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FeedError::HistoryFetch(format!(
                "{}: {}",
                status,
                truncate_chars(&text, 200)
            )));
        }

        let klines: Vec<BinanceKline> = response.json().await?;
        let Some(last) = klines.last() else {
            return Err(FeedError::EmptyHistory);
        };
        let last_candle_time = last.close_time();

        let closes: Vec<f64> = klines.iter().filter_map(|k| k.close_price()).collect();
        debug!("Fetched {} candle closes for {}", closes.len(), self.symbol);

        let event = EngineEvent::HistoryRefresh {
            closes,
            last_candle_time,
            at_ms: chrono::Utc::now().timestamp_millis(),
        };
        if self.events.send(event).await.is_err() {
            warn!("Engine event channel closed, dropping history refresh");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_KLINE: &str = r#"[
        1704067200000,
        "42000.00000000",
        "42500.00000000",
        "41800.00000000",
        "42350.50000000",
        "148.11427815",
        1704067259999,
        "6265432.19055334",
        308,
        "75.87402397",
        "3210456.46694368",
        "0"
    ]"#;

    #[test]
    fn test_kline_deserialization() {
        let kline: BinanceKline = serde_json::from_str(SAMPLE_KLINE).unwrap();
        assert_eq!(kline.close_time(), 1704067259999);
        assert_eq!(kline.close_price(), Some(42350.5));
    }

    #[test]
    fn test_kline_array_deserialization() {
        let json = format!("[{},{}]", SAMPLE_KLINE, SAMPLE_KLINE);
        let klines: Vec<BinanceKline> = serde_json::from_str(&json).unwrap();
        assert_eq!(klines.len(), 2);
        assert_eq!(klines[0].close_time(), 1704067259999);
    }

    #[test]
    fn test_close_price_rejects_garbage() {
        let mut kline: BinanceKline = serde_json::from_str(SAMPLE_KLINE).unwrap();
        kline.4 = "not-a-number".to_string();
        assert_eq!(kline.close_price(), None);

        kline.4 = "0".to_string();
        assert_eq!(kline.close_price(), None);

        kline.4 = "-42000".to_string();
        assert_eq!(kline.close_price(), None);
    }

    #[test]
    fn test_klines_url_construction() {
        let url = format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            "https://api.binance.com/api/v3",
            "BTCUSDT",
            "1m",
            WINDOW_SIZE
        );
        assert_eq!(
            url,
            "https://api.binance.com/api/v3/klines?symbol=BTCUSDT&interval=1m&limit=100"
        );
    }
}
