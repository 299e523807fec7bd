//! Scoring module - points awarded per match length tier
//!
//! - exactly 3 cells: 50 points
//! - exactly 4 cells: 100 points
//! - 5 or more cells: 150 points
//!
//! Points are summed per match; a cell shared by a horizontal and a vertical
//! match counts toward both matches' points.

use crate::matcher::Match;
use crate::types::MATCH_SCORES;

/// Score calculation result for one resolving round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub matches: u32,
    /// Longest run in the round.
    pub longest: u8,
    pub total: u32,
}

/// Points for a single match of `len` cells.
pub fn match_score(len: usize) -> u32 {
    match len {
        0..=2 => 0,
        3 => MATCH_SCORES[0],
        4 => MATCH_SCORES[1],
        _ => MATCH_SCORES[2],
    }
}

/// Score every match of a round.
pub fn calculate_score(matches: &[Match]) -> ScoreResult {
    matches.iter().fold(ScoreResult::default(), |acc, m| ScoreResult {
        matches: acc.matches + 1,
        longest: acc.longest.max(m.len),
        total: acc.total.saturating_add(match_score(m.len())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Axis, CandyKind, Pos};

    fn run(len: u8) -> Match {
        Match {
            axis: Axis::Horizontal,
            kind: CandyKind::Red,
            start: Pos::new(0, 0),
            len,
        }
    }

    #[test]
    fn test_match_score_tiers() {
        assert_eq!(match_score(2), 0);
        assert_eq!(match_score(3), 50);
        assert_eq!(match_score(4), 100);
        assert_eq!(match_score(5), 150);
        assert_eq!(match_score(8), 150);
    }

    #[test]
    fn test_calculate_score_sums_matches() {
        let result = calculate_score(&[run(3), run(4), run(6)]);
        assert_eq!(result.matches, 3);
        assert_eq!(result.longest, 6);
        assert_eq!(result.total, 300);
    }

    #[test]
    fn test_calculate_score_empty() {
        assert_eq!(calculate_score(&[]), ScoreResult::default());
    }
}
