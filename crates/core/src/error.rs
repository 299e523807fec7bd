//! Typed errors for the board simulation.

use crate::types::Pos;

/// Errors raised by board access and level generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("position ({x}, {y}) is outside the {size}x{size} board")]
    OutOfBounds { x: u8, y: u8, size: u8 },

    #[error("could not generate a match-free board after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("invalid board layout: {0}")]
    InvalidLayout(String),
}

/// Rejections from the move validator.
///
/// `NotAdjacent` and `BlockedBySpecial` are expected user-input rejections;
/// the session absorbs them by deselecting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cells {from:?} and {to:?} are not adjacent")]
    NotAdjacent { from: Pos, to: Pos },

    #[error("cell {pos:?} holds an obstacle")]
    BlockedBySpecial { pos: Pos },

    #[error("a cascade is still resolving")]
    Busy,

    #[error("the level has no moves or time left")]
    LevelOver,

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Fatal invariant violations while settling the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CascadeError {
    #[error("cascade did not settle after {rounds} rounds")]
    Runaway { rounds: u32 },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Any error produced by the core crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Cascade(#[from] CascadeError),
}
