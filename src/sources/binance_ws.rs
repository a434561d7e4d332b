use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::engine::EngineEvent;
use crate::error::{truncate_chars, FeedError, Result};

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);
/// Sessions that stay up at least this long reset the reconnect backoff.
const STABLE_CONNECTION: Duration = Duration::from_secs(30);

/// Trade event from the Binance stream. Other frames on the socket
/// (subscription acks, combined-stream events) leave these fields unset.
#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(rename = "e")]
    event_type: Option<String>,
    #[serde(rename = "p")]
    price: Option<String>,
}

/// Extract a trade price from a raw frame. Non-trade frames map to
/// Ok(None); trade frames with unusable prices are errors.
fn parse_trade(text: &str) -> Result<Option<f64>> {
    let msg: StreamMessage = serde_json::from_str(text)?;

    if msg.event_type.as_deref() != Some("trade") {
        return Ok(None);
    }

    let price = msg
        .price
        .as_deref()
        .and_then(|p| p.parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p > 0.0);

    match price {
        Some(price) => Ok(Some(price)),
        None => Err(FeedError::MalformedTrade(truncate_chars(text, 200))),
    }
}

/// Live trade stream over the Binance WebSocket API, feeding tick events
/// into the engine.
pub struct TradeStream {
    url: String,
    symbol: String,
    events: mpsc::Sender<EngineEvent>,
}

impl TradeStream {
    pub fn new(config: &Config, events: mpsc::Sender<EngineEvent>) -> Self {
        let url = format!(
            "{}/{}@trade",
            config.binance_ws_url,
            config.symbol.to_lowercase()
        );

        Self {
            url,
            symbol: config.symbol.clone(),
            events,
        }
    }

    /// Maintain a live trade connection until shutdown, reconnecting with
    /// exponential backoff.
    pub async fn connect(self, shutdown: CancellationToken) {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let started = Instant::now();
            let result = self.run_connection(&shutdown).await;

            if shutdown.is_cancelled() {
                break;
            }

            match result {
                Ok(()) => warn!("Trade stream disconnected, reconnecting..."),
                Err(e) => error!("Trade stream error: {}, reconnecting...", e),
            }
            self.send_status(false).await;

            if started.elapsed() >= STABLE_CONNECTION {
                backoff = INITIAL_BACKOFF;
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(backoff) => {}
            }
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }

        info!("Trade stream stopped");
    }

    async fn run_connection(&self, shutdown: &CancellationToken) -> Result<()> {
        info!("Connecting to trade stream: {}", self.url);
        let (ws_stream, _) = connect_async(&self.url).await?;
        let (mut write, mut read) = ws_stream.split();
        info!("Trade stream connected for {}", self.symbol);
        self.send_status(true).await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_text(&text).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = write.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            info!("Trade stream closed by server");
                            break;
                        }
                        Some(Err(e)) => {
                            return Err(e.into());
                        }
                        None => {
                            break;
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(())
    }

    async fn handle_text(&self, text: &str) {
        match parse_trade(text) {
            Ok(Some(price)) => {
                debug!("Trade update: {} = ${}", self.symbol, price);
                let event = EngineEvent::LiveTick {
                    price,
                    at_ms: chrono::Utc::now().timestamp_millis(),
                };
                if self.events.send(event).await.is_err() {
                    warn!("Engine event channel closed, dropping tick");
                }
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Skipping unusable trade frame: {}", e);
            }
        }
    }

    async fn send_status(&self, connected: bool) {
        let event = EngineEvent::FeedStatus {
            connected,
            at_ms: chrono::Utc::now().timestamp_millis(),
        };
        let _ = self.events.send(event).await;
    }
}
