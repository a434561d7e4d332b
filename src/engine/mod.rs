//! Core signal engine: a single-owner state reducer fed by feed events,
//! publishing snapshots over a watch channel.

pub mod decision;
pub mod history;
pub mod predictions;
pub mod rsi;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::types::{BotState, TrackerSnapshot};

use self::history::PriceHistory;
use self::predictions::PredictionLog;

/// Depth of the inbound event queue shared by the feed tasks.
pub const EVENT_QUEUE_DEPTH: usize = 1024;

/// Inputs to the engine. Each event carries the wall-clock time it was
/// produced; handlers never read the clock themselves.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Fresh batch of candle closes from the REST poller.
    HistoryRefresh {
        closes: Vec<f64>,
        last_candle_time: i64,
        at_ms: i64,
    },
    /// Single trade price from the live stream.
    LiveTick { price: f64, at_ms: i64 },
    /// Feed connectivity change.
    FeedStatus { connected: bool, at_ms: i64 },
}

/// All mutable engine state, owned by one task and mutated only via `apply`.
#[derive(Debug)]
pub struct EngineState {
    period: usize,
    history: PriceHistory,
    bot: BotState,
    log: PredictionLog,
    score: i64,
    live_price: Option<f64>,
    previous_price: Option<f64>,
    feed_connected: bool,
    updated_at: i64,
}

impl EngineState {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            history: PriceHistory::default(),
            bot: BotState::default(),
            log: PredictionLog::default(),
            score: 0,
            live_price: None,
            previous_price: None,
            feed_connected: false,
            updated_at: 0,
        }
    }

    /// Apply one event. Returns whether observable state changed and a new
    /// snapshot should be published.
    pub fn apply(&mut self, event: EngineEvent) -> bool {
        match event {
            EngineEvent::HistoryRefresh {
                closes,
                last_candle_time,
                at_ms,
            } => self.on_history_refresh(closes, last_candle_time, at_ms),
            EngineEvent::LiveTick { price, at_ms } => self.on_live_tick(price, at_ms),
            EngineEvent::FeedStatus { connected, at_ms } => self.on_feed_status(connected, at_ms),
        }
    }

    fn on_history_refresh(&mut self, closes: Vec<f64>, last_candle_time: i64, at_ms: i64) -> bool {
        if !self.history.bootstrap(closes, last_candle_time) {
            warn!("Ignoring empty history refresh");
            return false;
        }

        self.updated_at = at_ms;
        let closes = self.history.closes().to_vec();
        self.reevaluate(&closes);
        true
    }

    fn on_live_tick(&mut self, price: f64, at_ms: i64) -> bool {
        if !price.is_finite() || price <= 0.0 {
            warn!("Ignoring malformed tick price: {}", price);
            return false;
        }

        self.previous_price = self.live_price;
        self.live_price = Some(price);
        self.updated_at = at_ms;

        // Settle aged pending predictions before the signal can change
        let batch = self.log.resolve_pending(price, at_ms);
        if !batch.is_empty() {
            self.score += batch.score_delta();
            info!(
                "Settled {} win(s) / {} loss(es) at ${}, score now {}",
                batch.wins, batch.losses, price, self.score
            );
        }

        if self.history.len() >= self.period {
            let prior = self.bot.signal;
            let extended = self.history.with_live_price(price);
            self.reevaluate(&extended);

            // Predictions open only when the published signal flips to a
            // different directional value; refreshes never open them.
            if self.bot.is_ready && self.bot.signal != prior {
                if let Some(direction) = self.bot.signal.direction() {
                    let id = self.log.open(direction, price, at_ms);
                    info!(
                        "Opened {} prediction {} at ${}",
                        direction.label(),
                        id,
                        price
                    );
                }
            }
        }

        true
    }

    fn on_feed_status(&mut self, connected: bool, at_ms: i64) -> bool {
        if self.feed_connected == connected {
            return false;
        }

        self.feed_connected = connected;
        self.updated_at = at_ms;
        true
    }

    /// Recompute the bot state from an RSI pass over `prices`.
    fn reevaluate(&mut self, prices: &[f64]) {
        let values = rsi::series(prices, self.period);
        let Some(&latest) = values.last() else {
            self.bot.is_ready = false;
            return;
        };
        let previous = if values.len() >= 2 {
            Some(values[values.len() - 2])
        } else {
            None
        };

        let decision = decision::decide(latest, previous);
        self.bot = BotState {
            is_ready: true,
            current_rsi: Some(latest),
            signal: decision.signal,
            confidence: decision.confidence,
            reason: decision.reason,
        };
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            bot: self.bot.clone(),
            predictions: self.log.to_vec(),
            score: self.score,
            live_price: self.live_price,
            previous_price: self.previous_price,
            feed_connected: self.feed_connected,
            last_candle_time: self.history.last_candle_time(),
            updated_at: self.updated_at,
        }
    }
}

/// Engine task: drains the event queue, applies each event to the state, and
/// publishes a fresh snapshot after every observable change.
pub struct TrackerEngine {
    state: EngineState,
    events: mpsc::Receiver<EngineEvent>,
    snapshots: watch::Sender<TrackerSnapshot>,
    shutdown: CancellationToken,
}

impl TrackerEngine {
    pub fn new(
        period: usize,
        shutdown: CancellationToken,
    ) -> (
        Self,
        mpsc::Sender<EngineEvent>,
        watch::Receiver<TrackerSnapshot>,
    ) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let state = EngineState::new(period);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

        let engine = Self {
            state,
            events: event_rx,
            snapshots: snapshot_tx,
            shutdown,
        };
        (engine, event_tx, snapshot_rx)
    }

    pub async fn run(mut self) {
        info!("Signal engine started (RSI period {})", self.state.period);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Signal engine: shutdown requested");
                    break;
                }

                event = self.events.recv() => {
                    match event {
                        Some(event) => {
                            if self.state.apply(event) {
                                self.snapshots.send_replace(self.state.snapshot());
                            }
                        }
                        None => {
                            warn!("Signal engine event channel closed");
                            break;
                        }
                    }
                }
            }
        }

        info!("Signal engine stopped");
    }
}
