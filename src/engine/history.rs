//! Rolling window of candle close prices.

/// Maximum number of closes retained, oldest dropped first.
pub const WINDOW_SIZE: usize = 100;

/// Bounded buffer of candle closes in chronological order, plus the close
/// time of the newest candle.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    closes: Vec<f64>,
    last_candle_time: Option<i64>,
}

impl PriceHistory {
    /// Replace the buffer with a fresh batch of closes. An empty batch is
    /// rejected and leaves the existing buffer untouched; returns whether the
    /// replacement happened. Batches longer than the window are truncated to
    /// the newest `WINDOW_SIZE` entries.
    pub fn bootstrap(&mut self, mut closes: Vec<f64>, last_candle_time: i64) -> bool {
        if closes.is_empty() {
            return false;
        }

        if closes.len() > WINDOW_SIZE {
            closes.drain(..closes.len() - WINDOW_SIZE);
        }

        self.closes = closes;
        self.last_candle_time = Some(last_candle_time);
        true
    }

    /// Copy of the buffer with `price` appended as a provisional final entry.
    /// Used to evaluate indicators against the live tick without mutating
    /// the candle history.
    pub fn with_live_price(&self, price: f64) -> Vec<f64> {
        let mut extended = Vec::with_capacity(self.closes.len() + 1);
        extended.extend_from_slice(&self.closes);
        extended.push(price);
        extended
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last_candle_time(&self) -> Option<i64> {
        self.last_candle_time
    }
}
