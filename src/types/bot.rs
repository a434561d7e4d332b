use super::Direction;
use serde::{Deserialize, Serialize};

/// Published trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BotSignal {
    Up,
    Down,
    Hold,
}

impl BotSignal {
    pub fn label(&self) -> &'static str {
        match self {
            BotSignal::Up => "UP",
            BotSignal::Down => "DOWN",
            BotSignal::Hold => "HOLD",
        }
    }

    /// Directional signals map to a prediction direction; HOLD maps to none.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            BotSignal::Up => Some(Direction::Up),
            BotSignal::Down => Some(Direction::Down),
            BotSignal::Hold => None,
        }
    }
}

/// Current output of the signal engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotState {
    /// False until enough history has accumulated to compute an RSI value.
    pub is_ready: bool,
    /// Latest RSI value, None before the first evaluation.
    pub current_rsi: Option<f64>,
    pub signal: BotSignal,
    /// Confidence percentage (0-95). Zero for HOLD.
    pub confidence: u8,
    /// Human-readable explanation of the current signal.
    pub reason: String,
}

impl Default for BotState {
    fn default() -> Self {
        Self {
            is_ready: false,
            current_rsi: None,
            signal: BotSignal::Hold,
            confidence: 0,
            reason: "Initializing Engine...".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_signal_labels() {
        assert_eq!(BotSignal::Up.label(), "UP");
        assert_eq!(BotSignal::Down.label(), "DOWN");
        assert_eq!(BotSignal::Hold.label(), "HOLD");
    }

    #[test]
    fn test_bot_signal_direction_mapping() {
        assert_eq!(BotSignal::Up.direction(), Some(Direction::Up));
        assert_eq!(BotSignal::Down.direction(), Some(Direction::Down));
        assert_eq!(BotSignal::Hold.direction(), None);
    }

    #[test]
    fn test_bot_signal_serialization() {
        assert_eq!(serde_json::to_string(&BotSignal::Up).unwrap(), "\"UP\"");
        assert_eq!(serde_json::to_string(&BotSignal::Down).unwrap(), "\"DOWN\"");
        assert_eq!(serde_json::to_string(&BotSignal::Hold).unwrap(), "\"HOLD\"");
    }

    #[test]
    fn test_bot_state_default() {
        let state = BotState::default();

        assert!(!state.is_ready);
        assert!(state.current_rsi.is_none());
        assert_eq!(state.signal, BotSignal::Hold);
        assert_eq!(state.confidence, 0);
        assert_eq!(state.reason, "Initializing Engine...");
    }

    #[test]
    fn test_bot_state_serialization() {
        let state = BotState {
            is_ready: true,
            current_rsi: Some(62.5),
            signal: BotSignal::Up,
            confidence: 65,
            reason: "Bullish Momentum Cross (RSI: 62.5 > 50)".to_string(),
        };

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"isReady\":true"));
        assert!(json.contains("\"currentRsi\":62.5"));
        assert!(json.contains("\"signal\":\"UP\""));
        assert!(json.contains("\"confidence\":65"));
    }

    #[test]
    fn test_bot_state_default_serializes_null_rsi() {
        let json = serde_json::to_string(&BotState::default()).unwrap();
        assert!(json.contains("\"currentRsi\":null"));
    }
}
