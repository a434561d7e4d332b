use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction a prediction bets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }
}

/// Lifecycle state of a prediction. WIN and LOSS are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PredictionStatus {
    Pending,
    Win,
    Loss,
}

/// A single directional prediction and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: Uuid,
    /// Millisecond timestamp of the tick that opened this prediction.
    pub created_at: i64,
    pub direction: Direction,
    /// Price at creation; outcomes compare against this.
    pub reference_price: f64,
    pub status: PredictionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_price: Option<f64>,
}

impl PredictionRecord {
    pub fn new(direction: Direction, reference_price: f64, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            direction,
            reference_price,
            status: PredictionStatus::Pending,
            resolved_price: None,
        }
    }

    /// Settle this prediction against `price`. Returns the terminal status on
    /// a state change, or None if the record is already settled or the price
    /// exactly equals the reference (ties stay pending).
    pub fn resolve(&mut self, price: f64) -> Option<PredictionStatus> {
        if self.status != PredictionStatus::Pending {
            return None;
        }

        let won = match self.direction {
            Direction::Up => price > self.reference_price,
            Direction::Down => price < self.reference_price,
        };
        let lost = match self.direction {
            Direction::Up => price < self.reference_price,
            Direction::Down => price > self.reference_price,
        };

        if !won && !lost {
            return None;
        }

        self.status = if won {
            PredictionStatus::Win
        } else {
            PredictionStatus::Loss
        };
        self.resolved_price = Some(price);
        Some(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_prediction_is_pending() {
        let record = PredictionRecord::new(Direction::Up, 50000.0, 1704067200000);

        assert_eq!(record.status, PredictionStatus::Pending);
        assert_eq!(record.direction, Direction::Up);
        assert_eq!(record.reference_price, 50000.0);
        assert_eq!(record.created_at, 1704067200000);
        assert!(record.resolved_price.is_none());
    }

    #[test]
    fn test_up_prediction_wins_on_higher_price() {
        let mut record = PredictionRecord::new(Direction::Up, 50000.0, 0);

        assert_eq!(record.resolve(50001.0), Some(PredictionStatus::Win));
        assert_eq!(record.status, PredictionStatus::Win);
        assert_eq!(record.resolved_price, Some(50001.0));
    }

    #[test]
    fn test_up_prediction_loses_on_lower_price() {
        let mut record = PredictionRecord::new(Direction::Up, 50000.0, 0);

        assert_eq!(record.resolve(49999.0), Some(PredictionStatus::Loss));
        assert_eq!(record.status, PredictionStatus::Loss);
    }

    #[test]
    fn test_down_prediction_wins_on_lower_price() {
        let mut record = PredictionRecord::new(Direction::Down, 50000.0, 0);

        assert_eq!(record.resolve(49000.0), Some(PredictionStatus::Win));
    }

    #[test]
    fn test_down_prediction_loses_on_higher_price() {
        let mut record = PredictionRecord::new(Direction::Down, 50000.0, 0);

        assert_eq!(record.resolve(51000.0), Some(PredictionStatus::Loss));
    }

    #[test]
    fn test_exact_tie_stays_pending() {
        let mut record = PredictionRecord::new(Direction::Up, 50000.0, 0);

        assert_eq!(record.resolve(50000.0), None);
        assert_eq!(record.status, PredictionStatus::Pending);
        assert!(record.resolved_price.is_none());
    }

    #[test]
    fn test_settled_record_is_immutable() {
        let mut record = PredictionRecord::new(Direction::Up, 50000.0, 0);
        record.resolve(51000.0);

        assert_eq!(record.resolve(40000.0), None);
        assert_eq!(record.status, PredictionStatus::Win);
        assert_eq!(record.resolved_price, Some(51000.0));
    }

    #[test]
    fn test_record_serialization() {
        let record = PredictionRecord::new(Direction::Down, 67890.5, 1704067200000);
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"direction\":\"DOWN\""));
        assert!(json.contains("\"status\":\"PENDING\""));
        assert!(json.contains("\"referencePrice\":67890.5"));
        assert!(json.contains("\"createdAt\":1704067200000"));
        assert!(!json.contains("resolvedPrice")); // None omitted
    }

    #[test]
    fn test_resolved_record_serializes_price() {
        let mut record = PredictionRecord::new(Direction::Up, 100.0, 0);
        record.resolve(105.0);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"status\":\"WIN\""));
        assert!(json.contains("\"resolvedPrice\":105.0"));
    }
}
