//! Prediction log: open directional predictions, settle them against live
//! prices, and tally the score swing per settlement sweep.

use std::collections::VecDeque;

use uuid::Uuid;

use crate::types::{Direction, PredictionRecord, PredictionStatus};

/// Maximum number of prediction records retained.
pub const MAX_LOG_ENTRIES: usize = 50;
/// Minimum age before a pending prediction may settle.
pub const MIN_RESOLUTION_AGE_MS: i64 = 5_000;
/// Points gained per win and lost per loss.
pub const POINTS_PER_RESOLUTION: i64 = 10;

/// Settlement counts from a single sweep over the pending records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionBatch {
    pub wins: usize,
    pub losses: usize,
}

impl ResolutionBatch {
    /// Net score change: +10 per win, -10 per loss.
    pub fn score_delta(&self) -> i64 {
        (self.wins as i64 - self.losses as i64) * POINTS_PER_RESOLUTION
    }

    pub fn is_empty(&self) -> bool {
        self.wins == 0 && self.losses == 0
    }
}

/// Bounded log of predictions, newest first.
#[derive(Debug, Clone, Default)]
pub struct PredictionLog {
    records: VecDeque<PredictionRecord>,
}

impl PredictionLog {
    /// Open a new pending prediction at the front of the log. Evicting past
    /// the cap drops the oldest record even if still pending, forfeiting any
    /// score it would have produced.
    pub fn open(&mut self, direction: Direction, reference_price: f64, created_at: i64) -> Uuid {
        let record = PredictionRecord::new(direction, reference_price, created_at);
        let id = record.id;
        self.records.push_front(record);
        self.records.truncate(MAX_LOG_ENTRIES);
        id
    }

    /// Settle every pending record that has aged past the dwell window
    /// against `price`. Records younger than the window, and exact ties,
    /// stay pending for a later sweep.
    pub fn resolve_pending(&mut self, price: f64, now_ms: i64) -> ResolutionBatch {
        let mut batch = ResolutionBatch::default();

        for record in self.records.iter_mut() {
            if record.status != PredictionStatus::Pending {
                continue;
            }
            if now_ms - record.created_at < MIN_RESOLUTION_AGE_MS {
                continue;
            }

            match record.resolve(price) {
                Some(PredictionStatus::Win) => batch.wins += 1,
                Some(PredictionStatus::Loss) => batch.losses += 1,
                _ => {}
            }
        }

        batch
    }

    pub fn to_vec(&self) -> Vec<PredictionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == PredictionStatus::Pending)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_prepends_newest() {
        let mut log = PredictionLog::default();
        log.open(Direction::Up, 100.0, 1000);
        let second = log.open(Direction::Down, 200.0, 2000);

        let records = log.to_vec();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, second);
        assert_eq!(records[0].direction, Direction::Down);
        assert_eq!(records[1].direction, Direction::Up);
    }

    #[test]
    fn test_log_caps_at_limit() {
        let mut log = PredictionLog::default();
        for i in 0..55 {
            log.open(Direction::Up, 100.0 + i as f64, i as i64);
        }

        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        // Newest survive, oldest five are gone
        let records = log.to_vec();
        assert_eq!(records[0].reference_price, 154.0);
        assert_eq!(records[MAX_LOG_ENTRIES - 1].reference_price, 105.0);
    }

    #[test]
    fn test_resolution_respects_dwell_window() {
        let mut log = PredictionLog::default();
        log.open(Direction::Up, 100.0, 10_000);

        let batch = log.resolve_pending(105.0, 14_999);
        assert!(batch.is_empty());
        assert_eq!(log.pending_count(), 1);

        let batch = log.resolve_pending(105.0, 15_000);
        assert_eq!(batch.wins, 1);
        assert_eq!(log.pending_count(), 0);
    }

    #[test]
    fn test_tie_stays_pending() {
        let mut log = PredictionLog::default();
        log.open(Direction::Down, 100.0, 0);

        let batch = log.resolve_pending(100.0, 60_000);
        assert!(batch.is_empty());
        assert_eq!(log.pending_count(), 1);
    }

    #[test]
    fn test_sweep_settles_multiple_records() {
        let mut log = PredictionLog::default();
        log.open(Direction::Up, 100.0, 0); // wins at 150
        log.open(Direction::Down, 200.0, 0); // wins at 150
        log.open(Direction::Down, 120.0, 0); // loses at 150

        let batch = log.resolve_pending(150.0, 10_000);
        assert_eq!(batch.wins, 2);
        assert_eq!(batch.losses, 1);
        assert_eq!(batch.score_delta(), 10);
        assert_eq!(log.pending_count(), 0);
    }

    #[test]
    fn test_settled_records_are_skipped() {
        let mut log = PredictionLog::default();
        log.open(Direction::Up, 100.0, 0);

        let first = log.resolve_pending(110.0, 10_000);
        assert_eq!(first.wins, 1);

        // A later adverse sweep must not flip the settled record
        let second = log.resolve_pending(50.0, 20_000);
        assert!(second.is_empty());
        let records = log.to_vec();
        assert_eq!(records[0].status, PredictionStatus::Win);
        assert_eq!(records[0].resolved_price, Some(110.0));
    }

    #[test]
    fn test_eviction_forfeits_pending_score() {
        let mut log = PredictionLog::default();
        for i in 0..(MAX_LOG_ENTRIES + 1) {
            log.open(Direction::Up, 100.0, i as i64);
        }

        // 51 would-be winners, but the oldest was evicted before settling
        let batch = log.resolve_pending(150.0, 100_000);
        assert_eq!(batch.wins, MAX_LOG_ENTRIES);
        assert_eq!(batch.score_delta(), (MAX_LOG_ENTRIES as i64) * 10);
    }

    #[test]
    fn test_score_delta_arithmetic() {
        let batch = ResolutionBatch { wins: 3, losses: 5 };
        assert_eq!(batch.score_delta(), -20);
        assert!(!batch.is_empty());
        assert!(ResolutionBatch::default().is_empty());
    }
}
