//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, persistence).
//!
//! # Board Dimensions
//!
//! The playfield is a square grid:
//!
//! - **Size**: 8 columns x 8 rows (indexed 0-7)
//! - **Coordinates**: `Pos { x, y }` where `x` is the column and `y` the row,
//!   row 0 at the top. Gravity pulls tiles toward larger `y`.
//!
//! # Game Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FPS` | 30 | Target frame rate of the main loop |
//! | `FALL_SPEED_MILLIROWS_PER_MS` | 12 | Falling tiles descend 12 rows per second |
//! | `DEFAULT_MOVE_LIMIT` | 20 | Moves before the difficulty model is trained |
//! | `DEFAULT_TIME_LIMIT_SECS` | 60 | Seconds before the difficulty model is trained |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{CandyKind, Cell, Pos, GRID_SIZE};
//!
//! let cell = Cell::Candy(CandyKind::Blue);
//! assert!(cell.is_candy());
//! assert_eq!(cell.kind(), Some(CandyKind::Blue));
//!
//! let a = Pos::new(3, 4);
//! assert!(a.is_adjacent(Pos::new(3, 5)));
//! assert!(!a.is_adjacent(Pos::new(4, 5)));
//!
//! assert_eq!(GRID_SIZE, 8);
//! ```

/// Board width and height in cells.
pub const GRID_SIZE: u8 = 8;

/// Total number of cells on the board.
pub const GRID_CELLS: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// Default frame rate of the interactive loop.
pub const DEFAULT_FPS: u32 = 30;

/// Lowest accepted frame rate.
pub const MIN_FPS: u32 = 30;

/// Highest accepted frame rate.
pub const MAX_FPS: u32 = 60;

/// Falling tile speed in thousandths of a row per millisecond (12 rows/sec).
pub const FALL_SPEED_MILLIROWS_PER_MS: u32 = 12;

/// One row expressed in milli-rows.
pub const MILLIROWS_PER_ROW: i32 = 1000;

/// Score needed to complete a level.
pub const DEFAULT_TARGET_SCORE: u32 = 1000;

/// Move budget used until the difficulty model has been trained.
pub const DEFAULT_MOVE_LIMIT: u32 = 20;

/// Time budget (seconds) used until the difficulty model has been trained.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 60;

/// Clamp range for the adapted move budget.
pub const MOVE_LIMIT_MIN: u32 = 10;
pub const MOVE_LIMIT_MAX: u32 = 30;

/// Clamp range for the adapted time budget (seconds).
pub const TIME_LIMIT_MIN_SECS: u32 = 30;
pub const TIME_LIMIT_MAX_SECS: u32 = 120;

/// Safety cap on Scanning -> Resolving -> Falling rounds within one settle.
pub const CASCADE_ITERATION_CAP: u32 = 1000;

/// Retry cap for generating a level board without pre-existing matches.
pub const GENERATION_RETRY_CAP: u32 = 10_000;

/// Upper bound on obstacles placed on a board.
pub const MAX_OBSTACLES: u8 = 8;

/// Points per match by length tier: 3 cells, 4 cells, 5+ cells.
pub const MATCH_SCORES: [u32; 3] = [50, 100, 150];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_defaults_sit_inside_clamp_ranges() {
        assert!((MOVE_LIMIT_MIN..=MOVE_LIMIT_MAX).contains(&DEFAULT_MOVE_LIMIT));
        assert!((TIME_LIMIT_MIN_SECS..=TIME_LIMIT_MAX_SECS).contains(&DEFAULT_TIME_LIMIT_SECS));
        assert!((MIN_FPS..=MAX_FPS).contains(&DEFAULT_FPS));
    }

    #[test]
    fn pos_adjacency_is_orthogonal_and_unit() {
        let p = Pos::new(2, 2);
        assert!(p.is_adjacent(Pos::new(1, 2)));
        assert!(p.is_adjacent(Pos::new(3, 2)));
        assert!(p.is_adjacent(Pos::new(2, 1)));
        assert!(p.is_adjacent(Pos::new(2, 3)));

        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Pos::new(3, 3)));
        assert!(!p.is_adjacent(Pos::new(4, 2)));
    }

    #[test]
    fn candy_kind_index_roundtrip() {
        for (i, kind) in CandyKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(CandyKind::from_index(i), Some(*kind));
        }
        assert_eq!(CandyKind::from_index(6), None);
    }
}

/// The six candy kinds
///
/// Each kind has a distinct color in the default theme:
/// - **Red**, **Green**, **Blue**, **Yellow**, **Magenta**, **Cyan**
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CandyKind {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
}

impl CandyKind {
    /// All kinds in draw order.
    pub const ALL: [CandyKind; 6] = [
        CandyKind::Red,
        CandyKind::Green,
        CandyKind::Blue,
        CandyKind::Yellow,
        CandyKind::Magenta,
        CandyKind::Cyan,
    ];

    /// Number of distinct kinds.
    pub const COUNT: usize = 6;

    pub fn index(&self) -> usize {
        match self {
            CandyKind::Red => 0,
            CandyKind::Green => 1,
            CandyKind::Blue => 2,
            CandyKind::Yellow => 3,
            CandyKind::Magenta => 4,
            CandyKind::Cyan => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::CandyKind;
    ///
    /// assert_eq!(CandyKind::from_str("red"), Some(CandyKind::Red));
    /// assert_eq!(CandyKind::from_str("CYAN"), Some(CandyKind::Cyan));
    /// assert_eq!(CandyKind::from_str("purple"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(CandyKind::Red),
            "green" => Some(CandyKind::Green),
            "blue" => Some(CandyKind::Blue),
            "yellow" => Some(CandyKind::Yellow),
            "magenta" => Some(CandyKind::Magenta),
            "cyan" => Some(CandyKind::Cyan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CandyKind::Red => "red",
            CandyKind::Green => "green",
            CandyKind::Blue => "blue",
            CandyKind::Yellow => "yellow",
            CandyKind::Magenta => "magenta",
            CandyKind::Cyan => "cyan",
        }
    }
}

/// A cell on the game board
///
/// - `Empty`: transient hole left by a cleared match (only exists mid-cascade)
/// - `Candy(kind)`: a matchable, movable tile
/// - `Obstacle`: immovable, never matches, blocks runs and falling tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Candy(CandyKind),
    Obstacle,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_candy(&self) -> bool {
        matches!(self, Cell::Candy(_))
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, Cell::Obstacle)
    }

    /// Candy kind, if this cell holds one.
    pub fn kind(&self) -> Option<CandyKind> {
        match self {
            Cell::Candy(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Compact encoding used by snapshots: 0 = empty, 1..=6 = candy, 255 = obstacle.
    pub fn to_u8(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Candy(kind) => kind.index() as u8 + 1,
            Cell::Obstacle => u8::MAX,
        }
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Cell::Empty,
            u8::MAX => Cell::Obstacle,
            n => CandyKind::from_index(n as usize - 1)
                .map(Cell::Candy)
                .unwrap_or(Cell::Empty),
        }
    }
}

/// Board coordinate: `x` is the column, `y` the row (row 0 at the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are inside `[0, GRID_SIZE)`.
    pub fn in_bounds(&self) -> bool {
        self.x < GRID_SIZE && self.y < GRID_SIZE
    }

    /// True when `other` differs by exactly one cell along exactly one axis.
    pub fn is_adjacent(&self, other: Pos) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx + dy == 1
    }

    /// Step one cell in `dir`, staying on the board.
    pub fn step(&self, dir: Direction) -> Pos {
        let max = GRID_SIZE - 1;
        match dir {
            Direction::Up => Pos::new(self.x, self.y.saturating_sub(1)),
            Direction::Down => Pos::new(self.x, (self.y + 1).min(max)),
            Direction::Left => Pos::new(self.x.saturating_sub(1), self.y),
            Direction::Right => Pos::new((self.x + 1).min(max), self.y),
        }
    }
}

/// Axis of a match run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Cursor movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Keys the engine understands, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Esc,
    Char(char),
}

/// Events produced once per frame by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    /// Pointer press in surface coordinates.
    PointerDown { x: u16, y: u16 },
}

/// Game actions that can be applied to the session
///
/// Keyboard input is mapped to these; pointer input is translated
/// into [`GameAction::SelectAt`] via a [`BoardLayout`] hit-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the keyboard cursor one cell
    MoveCursor(Direction),
    /// Select (or swap with) the cell under the cursor
    Select,
    /// Select (or swap with) a specific cell
    SelectAt(Pos),
    /// Drop the current selection
    Deselect,
    /// Leave a level-complete screen
    Continue,
    /// Start over from level 1 (game-over screen)
    Restart,
    /// Leave the game
    Quit,
}

/// Modal screen drawn on top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    LevelComplete {
        level: u32,
        next_move_limit: u32,
        next_time_limit_secs: u32,
    },
    GameOver {
        total_score: u32,
        new_highscore: bool,
    },
}

/// Where the board sits on a render surface.
///
/// Produced by the view for a given viewport and used to translate
/// pointer presses back into board cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Surface column of the first board cell.
    pub origin_x: u16,
    /// Surface row of the first board cell.
    pub origin_y: u16,
    pub cell_w: u16,
    pub cell_h: u16,
}

impl BoardLayout {
    /// Board cell under a surface point, if any.
    pub fn cell_at(&self, x: u16, y: u16) -> Option<Pos> {
        if x < self.origin_x || y < self.origin_y || self.cell_w == 0 || self.cell_h == 0 {
            return None;
        }
        let cx = (x - self.origin_x) / self.cell_w;
        let cy = (y - self.origin_y) / self.cell_h;
        if cx >= GRID_SIZE as u16 || cy >= GRID_SIZE as u16 {
            return None;
        }
        Some(Pos::new(cx as u8, cy as u8))
    }
}
