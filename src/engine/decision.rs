//! Signal decision rules mapping RSI readings to a published signal.

use crate::types::BotSignal;

/// RSI at or below this level is considered oversold.
pub const OVERSOLD: f64 = 30.0;
/// RSI at or above this level is considered overbought.
pub const OVERBOUGHT: f64 = 70.0;
/// Midline used for momentum cross detection.
pub const MIDLINE: f64 = 50.0;
/// Confidence ceiling for extreme-zone signals.
pub const MAX_CONFIDENCE: f64 = 95.0;
/// Fixed confidence assigned to midline crosses.
pub const CROSS_CONFIDENCE: u8 = 65;

/// Outcome of evaluating the decision rules for one RSI reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub signal: BotSignal,
    pub confidence: u8,
    pub reason: String,
}

/// Evaluate the rule ladder for the latest RSI value. Rules are checked in
/// priority order and the first match wins; extreme zones outrank crosses.
/// Cross rules only apply when a previous reading exists.
pub fn decide(latest: f64, previous: Option<f64>) -> Decision {
    if latest <= OVERSOLD {
        return Decision {
            signal: BotSignal::Up,
            confidence: clamp_confidence(100.0 - latest + 20.0),
            reason: format!("Oversold Territory (RSI: {:.1} < 30)", latest),
        };
    }

    if latest >= OVERBOUGHT {
        return Decision {
            signal: BotSignal::Down,
            confidence: clamp_confidence(latest + 10.0),
            reason: format!("Overbought Territory (RSI: {:.1} > 70)", latest),
        };
    }

    if let Some(previous) = previous {
        if latest > MIDLINE && previous <= MIDLINE {
            return Decision {
                signal: BotSignal::Up,
                confidence: CROSS_CONFIDENCE,
                reason: format!("Bullish Momentum Cross (RSI: {:.1} > 50)", latest),
            };
        }

        if latest < MIDLINE && previous >= MIDLINE {
            return Decision {
                signal: BotSignal::Down,
                confidence: CROSS_CONFIDENCE,
                reason: format!("Bearish Momentum Cross (RSI: {:.1} < 50)", latest),
            };
        }
    }

    Decision {
        signal: BotSignal::Hold,
        confidence: 0,
        reason: format!("RSI Stable at {:.1}", latest),
    }
}

fn clamp_confidence(raw: f64) -> u8 {
    raw.min(MAX_CONFIDENCE).round() as u8
}
