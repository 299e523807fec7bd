//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board simulation: match detection, cascade
//! resolution, move execution, level bookkeeping and difficulty adaptation.
//! It has **no dependencies** on terminal, input, or file I/O, making it:
//!
//! - **Deterministic**: the same seed produces identical boards and refills
//! - **Testable**: every rule is exercised by unit tests
//! - **Portable**: runs headless, in benches, or behind any render surface
//!
//! # Module Structure
//!
//! - [`board`]: 8x8 grid of cells, match-free level generation
//! - [`matcher`]: row/column scan for runs of three or more
//! - [`cascade`]: Scanning / Resolving / Falling state machine with falling tiles
//! - [`game_state`]: move validation and execution, per-tick advance, level start
//! - [`level`]: score, move and time budgets of the current level
//! - [`difficulty`]: two linear regressors turning performance into the next budget
//! - [`scoring`]: points per match length
//! - [`rng`]: seeded candy source
//!
//! # Game Rules
//!
//! - Swapping two adjacent candies costs one move, even when no match forms
//!   (the swap is then undone).
//! - Obstacles never move, never match, and split runs and columns.
//! - Matches of 3 / 4 / 5+ cells score 50 / 100 / 150 points.
//! - A level is complete once its score reaches the target after the board settles.
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{GameConfig, GameState, MoveOutcome};
//! use tui_match3_types::Pos;
//!
//! let mut game = GameState::new(12345, GameConfig::default()).unwrap();
//! let before = game.level().moves_remaining;
//!
//! match game.attempt_move(Pos::new(0, 0), Pos::new(1, 0)) {
//!     Ok(MoveOutcome::Matched { .. }) | Ok(MoveOutcome::Reverted) => {
//!         assert_eq!(game.level().moves_remaining, before - 1);
//!     }
//!     Err(_) => assert_eq!(game.level().moves_remaining, before),
//! }
//!
//! game.settle().unwrap();
//! assert!(game.board().is_full());
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed milliseconds. It drains the level clock and animates falling tiles
//! at [`FALL_SPEED_MILLIROWS_PER_MS`](types::FALL_SPEED_MILLIROWS_PER_MS).

pub mod board;
pub mod cascade;
pub mod difficulty;
pub mod error;
pub mod game_state;
pub mod level;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use cascade::{CascadePhase, CascadeResolver, CascadeSummary, FallingTile};
pub use difficulty::{Budget, DifficultyAdapter, LinearModel, PerformanceSample};
pub use error::{BoardError, CascadeError, CoreError, MoveError};
pub use game_state::{obstacles_for_level, GameConfig, GameState, MoveOutcome};
pub use level::{LevelState, LevelStatus};
pub use matcher::{find_matches, find_matches_into, has_match, Match};
pub use rng::{CandySource, SimpleRng};
pub use scoring::{calculate_score, match_score, ScoreResult};
pub use snapshot::{FallingSnapshot, GameSnapshot};
