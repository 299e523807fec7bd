//! Game state module - owns the board simulation for one level at a time
//!
//! [`GameState`] ties together the board, the candy source, the level
//! bookkeeping and the cascade resolver. It validates and executes moves,
//! advances the cascade and level clock once per tick, and starts or restarts
//! levels. Session flow (overlays, difficulty feedback, persistence) lives a
//! layer above, in the engine crate.

use crate::board::Board;
use crate::cascade::{CascadeResolver, CascadeSummary, FallingTile};
use crate::difficulty::Budget;
use crate::error::{BoardError, CascadeError, MoveError};
use crate::level::{LevelState, LevelStatus};
use crate::matcher::find_matches;
use crate::rng::CandySource;
use crate::snapshot::{FallingSnapshot, GameSnapshot};
use crate::types::*;

/// Tunables for the board simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Number of candy kinds in play (3..=6).
    pub kinds: u8,
    pub target_score: u32,
    pub cascade_round_cap: u32,
    pub generation_retry_cap: u32,
    /// Falling speed in milli-rows per millisecond.
    pub fall_speed: u32,
    /// Budget for the first level.
    pub default_budget: Budget,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            kinds: CandyKind::COUNT as u8,
            target_score: DEFAULT_TARGET_SCORE,
            cascade_round_cap: CASCADE_ITERATION_CAP,
            generation_retry_cap: GENERATION_RETRY_CAP,
            fall_speed: FALL_SPEED_MILLIROWS_PER_MS,
            default_budget: Budget::default(),
        }
    }
}

/// Result of an accepted move. Both outcomes cost one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The swap produced matches; a cascade is now resolving.
    Matched { matches: usize },
    /// No match; the swap was undone.
    Reverted,
}

/// Obstacles placed on a level's board: none on level 1, one more per level after.
pub fn obstacles_for_level(level: u32) -> u8 {
    level.saturating_sub(1).min(MAX_OBSTACLES as u32) as u8
}

#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    level: LevelState,
    source: CandySource,
    cascade: CascadeResolver,
    /// Game-clock time in milliseconds, advanced only by `tick`.
    clock_ms: u64,
}

impl GameState {
    /// Start a new game at level 1 with the config's default budget.
    pub fn new(seed: u32, config: GameConfig) -> Result<Self, BoardError> {
        let mut source = CandySource::new(seed, config.kinds);
        let board = Board::generate(&mut source, obstacles_for_level(1), config.generation_retry_cap)?;
        Ok(Self::with_parts(config, board, source))
    }

    /// Start level 1 on a prepared board (the board is used as is).
    pub fn from_board(board: Board, seed: u32, config: GameConfig) -> Self {
        let source = CandySource::new(seed, config.kinds);
        Self::with_parts(config, board, source)
    }

    fn with_parts(config: GameConfig, board: Board, source: CandySource) -> Self {
        Self {
            level: LevelState::new(1, 0, config.target_score, config.default_budget, 0),
            cascade: CascadeResolver::new(config.cascade_round_cap, config.fall_speed),
            config,
            board,
            source,
            clock_ms: 0,
        }
    }

    /// Replace the current level with a freshly generated one.
    pub fn start_level(&mut self, level: u32, total_score: u32, budget: Budget) -> Result<(), BoardError> {
        let level = level.max(1);
        self.board = Board::generate(
            &mut self.source,
            obstacles_for_level(level),
            self.config.generation_retry_cap,
        )?;
        self.cascade.reset();
        self.level = LevelState::new(level, total_score, self.config.target_score, budget, self.clock_ms);
        Ok(())
    }

    /// Restart the current level on a new board with the same budget.
    ///
    /// Points already earned stay in the total score.
    pub fn restart_level(&mut self) -> Result<(), BoardError> {
        let LevelState {
            level, total_score, ..
        } = self.level;
        let budget = self.level.budget();
        self.start_level(level, total_score, budget)
    }

    /// Validate and execute a swap of two cells.
    ///
    /// Rejections cost nothing. An accepted swap costs exactly one move
    /// whether or not it matches; a swap without a match is undone.
    pub fn attempt_move(&mut self, a: Pos, b: Pos) -> Result<MoveOutcome, MoveError> {
        let cell_a = self.board.get(a)?;
        let cell_b = self.board.get(b)?;

        if self.is_animating() {
            return Err(MoveError::Busy);
        }
        if self.level.is_exhausted() {
            return Err(MoveError::LevelOver);
        }
        if !a.is_adjacent(b) {
            return Err(MoveError::NotAdjacent { from: a, to: b });
        }
        if cell_a.is_obstacle() {
            return Err(MoveError::BlockedBySpecial { pos: a });
        }
        if cell_b.is_obstacle() {
            return Err(MoveError::BlockedBySpecial { pos: b });
        }

        self.board.swap(a, b)?;
        let matches = find_matches(&self.board);
        self.level.consume_move();

        if matches.is_empty() {
            self.board.swap(a, b)?;
            return Ok(MoveOutcome::Reverted);
        }

        let count = matches.len();
        self.cascade.begin(matches);
        Ok(MoveOutcome::Matched { matches: count })
    }

    /// Advance the level clock and any cascade in progress.
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<(), CascadeError> {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms as u64);
        self.level.tick(elapsed_ms);
        self.cascade
            .step(&mut self.board, &mut self.level, &mut self.source, elapsed_ms)
    }

    /// Resolve any pending cascade immediately, without animation.
    pub fn settle(&mut self) -> Result<CascadeSummary, CascadeError> {
        self.cascade
            .run_to_idle(&mut self.board, &mut self.level, &mut self.source)
    }

    /// True while a cascade is resolving or tiles are falling; gates input.
    pub fn is_animating(&self) -> bool {
        !self.cascade.is_idle()
    }

    pub fn is_settled(&self) -> bool {
        self.cascade.is_idle()
    }

    /// Level status; `InProgress` until the board has settled.
    pub fn level_status(&self) -> LevelStatus {
        if self.is_animating() {
            LevelStatus::InProgress
        } else {
            self.level.status()
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> &LevelState {
        &self.level
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn falling(&self) -> &[FallingTile] {
        self.cascade.falling()
    }

    /// Totals of the current (or last) settle.
    pub fn cascade_summary(&self) -> CascadeSummary {
        self.cascade.summary()
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn score(&self) -> u32 {
        self.level.score
    }

    pub fn total_score(&self) -> u32 {
        self.level.total_score
    }

    /// Fill the board and level fields of `out`; session fields are left alone.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.falling.clear();
        out.falling
            .extend(self.cascade.falling().iter().copied().map(FallingSnapshot::from));
        out.level = self.level.level;
        out.score = self.level.score;
        out.total_score = self.level.total_score;
        out.target_score = self.level.target_score;
        out.move_limit = self.level.move_limit;
        out.moves_remaining = self.level.moves_remaining;
        out.time_limit_ms = self.level.time_limit_ms;
        out.time_remaining_ms = self.level.time_remaining_ms;
        out.animating = self.is_animating();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: [&str; 8] = [
        "RGBYMCRG", "BYMCRGBY", "MCRGBYMC", "RGBYMCRG", "BYMCRGBY", "MCRGBYMC", "RGBYMCRG",
        "BYMCRGBY",
    ];

    fn game_with_row0(row0: &'static str) -> GameState {
        let mut rows = QUIET;
        rows[0] = row0;
        GameState::from_board(Board::from_rows(&rows).unwrap(), 42, GameConfig::default())
    }

    #[test]
    fn test_new_game_board_is_match_free() {
        let game = GameState::new(12345, GameConfig::default()).unwrap();
        assert!(find_matches(game.board()).is_empty());
        assert!(game.board().is_full());
        assert_eq!(game.board().count_obstacles(), 0);
        assert_eq!(game.level().moves_remaining, DEFAULT_MOVE_LIMIT);
    }

    #[test]
    fn test_obstacles_per_level() {
        assert_eq!(obstacles_for_level(1), 0);
        assert_eq!(obstacles_for_level(2), 1);
        assert_eq!(obstacles_for_level(9), 8);
        assert_eq!(obstacles_for_level(50), 8);
    }

    #[test]
    fn test_matching_move_costs_one_and_scores() {
        let mut game = game_with_row0("RRYRMCRG");
        let outcome = game.attempt_move(Pos::new(2, 0), Pos::new(3, 0)).unwrap();
        assert_eq!(outcome, MoveOutcome::Matched { matches: 1 });
        assert!(game.is_animating());
        assert_eq!(game.level().moves_remaining, DEFAULT_MOVE_LIMIT - 1);

        let summary = game.settle().unwrap();
        assert!(summary.points >= 50);
        assert!(game.score() >= 50);
        assert!(game.board().is_full());
        assert!(find_matches(game.board()).is_empty());
    }

    #[test]
    fn test_wasted_move_reverts_and_costs_one() {
        let mut game = GameState::from_board(
            Board::from_rows(&QUIET).unwrap(),
            1,
            GameConfig::default(),
        );
        let before = game.board().clone();
        let outcome = game.attempt_move(Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        assert_eq!(outcome, MoveOutcome::Reverted);
        assert_eq!(game.board(), &before);
        assert_eq!(game.level().moves_remaining, DEFAULT_MOVE_LIMIT - 1);
        assert!(!game.is_animating());
    }

    #[test]
    fn test_rejections_cost_nothing() {
        let mut rows = QUIET;
        rows[1] = "#YMCRGBY";
        let mut game = GameState::from_board(Board::from_rows(&rows).unwrap(), 1, GameConfig::default());

        assert_eq!(
            game.attempt_move(Pos::new(0, 0), Pos::new(2, 0)),
            Err(MoveError::NotAdjacent {
                from: Pos::new(0, 0),
                to: Pos::new(2, 0)
            })
        );
        assert_eq!(
            game.attempt_move(Pos::new(0, 0), Pos::new(0, 1)),
            Err(MoveError::BlockedBySpecial { pos: Pos::new(0, 1) })
        );
        assert!(matches!(
            game.attempt_move(Pos::new(7, 7), Pos::new(8, 7)),
            Err(MoveError::Board(BoardError::OutOfBounds { .. }))
        ));
        assert_eq!(game.level().moves_remaining, DEFAULT_MOVE_LIMIT);
    }

    #[test]
    fn test_moves_rejected_while_animating() {
        let mut game = game_with_row0("RRYRMCRG");
        game.attempt_move(Pos::new(2, 0), Pos::new(3, 0)).unwrap();
        assert_eq!(
            game.attempt_move(Pos::new(5, 5), Pos::new(5, 6)),
            Err(MoveError::Busy)
        );
        assert_eq!(game.level().moves_remaining, DEFAULT_MOVE_LIMIT - 1);
    }

    #[test]
    fn test_out_of_moves_ends_level() {
        let config = GameConfig {
            default_budget: Budget {
                move_limit: 1,
                time_limit_secs: 60,
            },
            ..GameConfig::default()
        };
        let mut game = GameState::from_board(Board::from_rows(&QUIET).unwrap(), 1, config);
        game.attempt_move(Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        assert_eq!(game.level_status(), LevelStatus::OutOfMoves);
        assert_eq!(
            game.attempt_move(Pos::new(0, 0), Pos::new(1, 0)),
            Err(MoveError::LevelOver)
        );
    }

    #[test]
    fn test_tick_animates_cascade_and_clock() {
        let mut game = game_with_row0("RRYRMCRG");
        game.attempt_move(Pos::new(2, 0), Pos::new(3, 0)).unwrap();

        game.tick(16).unwrap();
        assert_eq!(game.clock_ms(), 16);
        assert_eq!(game.level().time_remaining_ms, 60_000 - 16);
        assert!(!game.falling().is_empty());
        assert_eq!(game.level_status(), LevelStatus::InProgress);

        let mut frames = 0;
        while game.is_animating() && frames < 10_000 {
            game.tick(16).unwrap();
            frames += 1;
        }
        assert!(game.is_settled());
        assert!(game.board().is_full());
    }

    #[test]
    fn test_restart_level_keeps_total_score() {
        let mut game = game_with_row0("RRYRMCRG");
        game.attempt_move(Pos::new(2, 0), Pos::new(3, 0)).unwrap();
        game.settle().unwrap();
        let total = game.total_score();

        game.restart_level().unwrap();
        assert_eq!(game.total_score(), total);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level().moves_remaining, DEFAULT_MOVE_LIMIT);
        assert!(find_matches(game.board()).is_empty());
    }

    #[test]
    fn test_start_level_places_obstacles_and_budget() {
        let mut game = GameState::new(5, GameConfig::default()).unwrap();
        let budget = Budget {
            move_limit: 14,
            time_limit_secs: 45,
        };
        game.start_level(4, 2200, budget).unwrap();
        assert_eq!(game.level().level, 4);
        assert_eq!(game.total_score(), 2200);
        assert_eq!(game.level().budget(), budget);
        assert_eq!(game.board().count_obstacles(), 3);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let game = game_with_row0("RRYRMCRG");
        let snap = game.snapshot();
        assert_eq!(snap.board[0][0], Cell::Candy(CandyKind::Red).to_u8());
        assert_eq!(snap.moves_remaining, DEFAULT_MOVE_LIMIT);
        assert_eq!(snap.target_score, DEFAULT_TARGET_SCORE);
        assert!(!snap.animating);
        assert!(snap.falling.is_empty());
    }
}
