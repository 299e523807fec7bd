use arrayvec::ArrayVec;

use crate::cascade::FallingTile;
use crate::types::{CandyKind, Overlay, Pos, GRID_CELLS, GRID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingSnapshot {
    pub column: u8,
    /// Vertical position in milli-rows (negative above the board).
    pub y_milli: i32,
    pub kind: CandyKind,
}

impl From<FallingTile> for FallingSnapshot {
    fn from(value: FallingTile) -> Self {
        Self {
            column: value.column,
            y_milli: value.y_milli,
            kind: value.kind,
        }
    }
}

/// Everything a view needs to draw one frame.
///
/// `board` uses the [`Cell::to_u8`](crate::types::Cell::to_u8) encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: [[u8; GRID_SIZE as usize]; GRID_SIZE as usize],
    pub falling: ArrayVec<FallingSnapshot, GRID_CELLS>,
    pub level: u32,
    pub score: u32,
    pub total_score: u32,
    pub target_score: u32,
    pub move_limit: u32,
    pub moves_remaining: u32,
    pub time_limit_ms: u64,
    pub time_remaining_ms: u64,
    pub animating: bool,
    pub cursor: Pos,
    pub selected: Option<Pos>,
    pub overlay: Overlay,
    pub highscore: u32,
}

impl GameSnapshot {
    /// True when gameplay input would be accepted.
    pub fn playable(&self) -> bool {
        !self.animating && self.overlay == Overlay::None
    }

    /// Whole seconds left on the level clock, rounded up.
    pub fn time_remaining_secs(&self) -> u64 {
        self.time_remaining_ms.div_ceil(1000)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; GRID_SIZE as usize]; GRID_SIZE as usize],
            falling: ArrayVec::new(),
            level: 0,
            score: 0,
            total_score: 0,
            target_score: 0,
            move_limit: 0,
            moves_remaining: 0,
            time_limit_ms: 0,
            time_remaining_ms: 0,
            animating: false,
            cursor: Pos::default(),
            selected: None,
            overlay: Overlay::None,
            highscore: 0,
        }
    }
}
