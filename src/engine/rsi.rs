//! Relative Strength Index (RSI) calculation.

/// Default lookback period for RSI smoothing.
pub const DEFAULT_PERIOD: usize = 14;

/// Calculate a Wilder-smoothed RSI series over `prices`.
///
/// Measures momentum by comparing the magnitude of recent gains to recent
/// losses. Values range from 0-100:
/// - Below 30: Oversold (potential buy signal)
/// - Above 70: Overbought (potential sell signal)
///
/// Produces one value per price from index `period` onward, so the output
/// length is `prices.len() - period`. Returns an empty vec when fewer than
/// `period + 1` prices are available.
pub fn series(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period + 1 {
        return Vec::new();
    }

    let mut gains = Vec::new();
    let mut losses = Vec::new();

    for i in 1..prices.len() {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    // Seed with simple averages over the first period
    let mut avg_gain: f64 = gains.iter().take(period).sum::<f64>() / period as f64;
    let mut avg_loss: f64 = losses.iter().take(period).sum::<f64>() / period as f64;

    let mut values = Vec::with_capacity(gains.len() - period + 1);
    values.push(point(avg_gain, avg_loss));

    // Wilder smoothing for the remaining data
    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        values.push(point(avg_gain, avg_loss));
    }

    values
}

// Zero loss maps to 100 even when gain is also zero, so a flat window reads
// as overbought rather than dividing by zero.
fn point(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    if avg_gain == 0.0 {
        return 0.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
