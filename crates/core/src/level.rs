//! Per-level bookkeeping: score, move budget, time budget.

use crate::difficulty::{Budget, PerformanceSample};

/// Outcome of a level as seen from a settled board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    InProgress,
    Complete,
    OutOfMoves,
    OutOfTime,
}

/// State of the level being played.
///
/// `total_score` is cumulative across levels and never decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelState {
    pub level: u32,
    pub score: u32,
    pub total_score: u32,
    pub target_score: u32,
    pub move_limit: u32,
    pub moves_remaining: u32,
    pub time_limit_ms: u64,
    pub time_remaining_ms: u64,
    /// Game-clock time (ms) when the level started.
    pub start_timestamp_ms: u64,
}

impl LevelState {
    pub fn new(level: u32, total_score: u32, target_score: u32, budget: Budget, now_ms: u64) -> Self {
        let time_limit_ms = budget.time_limit_secs as u64 * 1000;
        Self {
            level,
            score: 0,
            total_score,
            target_score,
            move_limit: budget.move_limit,
            moves_remaining: budget.move_limit,
            time_limit_ms,
            time_remaining_ms: time_limit_ms,
            start_timestamp_ms: now_ms,
        }
    }

    /// Budget this level was started with.
    pub fn budget(&self) -> Budget {
        Budget {
            move_limit: self.move_limit,
            time_limit_secs: (self.time_limit_ms / 1000) as u32,
        }
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.total_score = self.total_score.saturating_add(points);
    }

    pub fn consume_move(&mut self) {
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
    }

    /// Advance the level timer.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.time_remaining_ms = self.time_remaining_ms.saturating_sub(elapsed_ms as u64);
    }

    pub fn moves_used(&self) -> u32 {
        self.move_limit.saturating_sub(self.moves_remaining)
    }

    pub fn time_used_ms(&self) -> u64 {
        self.time_limit_ms.saturating_sub(self.time_remaining_ms)
    }

    pub fn is_target_reached(&self) -> bool {
        self.score >= self.target_score
    }

    pub fn is_out_of_moves(&self) -> bool {
        self.moves_remaining == 0
    }

    pub fn is_out_of_time(&self) -> bool {
        self.time_remaining_ms == 0
    }

    /// True when no further move may be attempted.
    pub fn is_exhausted(&self) -> bool {
        self.is_out_of_moves() || self.is_out_of_time()
    }

    /// Status of the level; only meaningful once the board has settled.
    pub fn status(&self) -> LevelStatus {
        if self.is_target_reached() {
            LevelStatus::Complete
        } else if self.is_out_of_moves() {
            LevelStatus::OutOfMoves
        } else if self.is_out_of_time() {
            LevelStatus::OutOfTime
        } else {
            LevelStatus::InProgress
        }
    }

    /// Performance record for the difficulty adapter.
    pub fn sample(&self) -> PerformanceSample {
        PerformanceSample {
            level: self.level,
            moves_used: self.moves_used(),
            score: self.score,
            time_used: self.time_used_ms() as f64 / 1000.0,
        }
    }
}
