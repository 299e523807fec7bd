//! Board module - manages the game grid
//!
//! The board is an 8x8 grid where each cell is empty, a candy, or an obstacle.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x is the column (left to right) and y the row (top to bottom).
//!
//! The board does not validate move legality; callers check adjacency and obstacles
//! before calling [`Board::swap`].

use std::fmt;

use crate::error::BoardError;
use crate::matcher::find_matches;
use crate::rng::CandySource;
use crate::types::{CandyKind, Cell, Pos, GRID_CELLS, GRID_SIZE};

/// The game board - 8 columns x 8 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * SIZE + x)
    cells: [Cell; GRID_CELLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; GRID_CELLS],
        }
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(pos: Pos) -> Result<usize, BoardError> {
        if !pos.in_bounds() {
            return Err(BoardError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                size: GRID_SIZE,
            });
        }
        Ok((pos.y as usize) * (GRID_SIZE as usize) + (pos.x as usize))
    }

    /// Position of a flat index (index must be below `GRID_CELLS`)
    #[inline(always)]
    pub fn pos_of(index: usize) -> Pos {
        let size = GRID_SIZE as usize;
        Pos::new((index % size) as u8, (index / size) as u8)
    }

    /// Width and height of the board
    pub fn size(&self) -> u8 {
        GRID_SIZE
    }

    /// Get cell at `pos`
    pub fn get(&self, pos: Pos) -> Result<Cell, BoardError> {
        Self::index(pos).map(|idx| self.cells[idx])
    }

    /// Set cell at `pos`
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<(), BoardError> {
        let idx = Self::index(pos)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Exchange the contents of two cells unconditionally
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), BoardError> {
        let ia = Self::index(a)?;
        let ib = Self::index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Candy kind at `pos`, `None` for empty, obstacle, or out-of-bounds cells
    #[inline]
    pub fn kind_at(&self, x: u8, y: u8) -> Option<CandyKind> {
        Self::index(Pos::new(x, y))
            .ok()
            .and_then(|idx| self.cells[idx].kind())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// True when no cell is empty (every slot holds a candy or an obstacle)
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub fn count_obstacles(&self) -> usize {
        self.cells.iter().filter(|c| c.is_obstacle()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Write the compact `u8` encoding of every cell (see [`Cell::to_u8`])
    pub fn write_u8_grid(&self, out: &mut [[u8; GRID_SIZE as usize]; GRID_SIZE as usize]) {
        for (i, cell) in self.cells.iter().enumerate() {
            let p = Self::pos_of(i);
            out[p.y as usize][p.x as usize] = cell.to_u8();
        }
    }

    /// Generate a level board with `obstacles` blockers and no pre-existing match.
    ///
    /// Cells that take part in a match are re-randomized until the match detector
    /// reports nothing. With three or more kinds each retry breaks a run with
    /// probability at least 2/3, so this terminates almost surely; `retry_cap`
    /// turns a pathological sequence into [`BoardError::GenerationExhausted`].
    pub fn generate(
        source: &mut CandySource,
        obstacles: u8,
        retry_cap: u32,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new();
        for idx in source.pick_cells(obstacles as usize) {
            board.cells[idx] = Cell::Obstacle;
        }
        for cell in board.cells.iter_mut().filter(|c| !c.is_obstacle()) {
            *cell = Cell::Candy(source.next_kind());
        }

        for _ in 0..retry_cap {
            let matches = find_matches(&board);
            if matches.is_empty() {
                return Ok(board);
            }
            for m in &matches {
                for pos in m.cells() {
                    board.set(pos, Cell::Candy(source.next_kind()))?;
                }
            }
        }

        Err(BoardError::GenerationExhausted {
            attempts: retry_cap,
        })
    }

    /// Build a board from text rows.
    ///
    /// One character per cell: `R G B Y M C` for candy kinds (case-insensitive),
    /// `#` for an obstacle, `.` for an empty cell.
    ///
    /// ```
    /// use tui_match3_core::Board;
    /// use tui_match3_types::{CandyKind, Cell, Pos};
    ///
    /// let board = Board::from_rows(&[
    ///     "RGBYMCRG",
    ///     "GBYMCRGB",
    ///     "BYMCRGBY",
    ///     "YMC#GBYM",
    ///     "MCRGBYMC",
    ///     "CRGBYMCR",
    ///     "RGBYMCRG",
    ///     "GBYMCRGB",
    /// ])
    /// .unwrap();
    /// assert_eq!(board.get(Pos::new(0, 0)), Ok(Cell::Candy(CandyKind::Red)));
    /// assert_eq!(board.get(Pos::new(3, 3)), Ok(Cell::Obstacle));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        if rows.len() != GRID_SIZE as usize {
            return Err(BoardError::InvalidLayout(format!(
                "expected {} rows, got {}",
                GRID_SIZE,
                rows.len()
            )));
        }

        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != GRID_SIZE as usize {
                return Err(BoardError::InvalidLayout(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    chars.len(),
                    GRID_SIZE
                )));
            }
            for (x, ch) in chars.into_iter().enumerate() {
                let cell = cell_from_char(ch).ok_or_else(|| {
                    BoardError::InvalidLayout(format!("unknown cell '{}' at ({}, {})", ch, x, y))
                })?;
                board.cells[y * GRID_SIZE as usize + x] = cell;
            }
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE as usize {
            for x in 0..GRID_SIZE as usize {
                let ch = cell_to_char(self.cells[y * GRID_SIZE as usize + x]);
                write!(f, "{}", ch)?;
            }
            if y + 1 < GRID_SIZE as usize {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn cell_from_char(ch: char) -> Option<Cell> {
    let cell = match ch.to_ascii_uppercase() {
        'R' => Cell::Candy(CandyKind::Red),
        'G' => Cell::Candy(CandyKind::Green),
        'B' => Cell::Candy(CandyKind::Blue),
        'Y' => Cell::Candy(CandyKind::Yellow),
        'M' => Cell::Candy(CandyKind::Magenta),
        'C' => Cell::Candy(CandyKind::Cyan),
        '#' => Cell::Obstacle,
        '.' => Cell::Empty,
        _ => return None,
    };
    Some(cell)
}

fn cell_to_char(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Obstacle => '#',
        Cell::Candy(CandyKind::Red) => 'R',
        Cell::Candy(CandyKind::Green) => 'G',
        Cell::Candy(CandyKind::Blue) => 'B',
        Cell::Candy(CandyKind::Yellow) => 'Y',
        Cell::Candy(CandyKind::Magenta) => 'M',
        Cell::Candy(CandyKind::Cyan) => 'C',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(Pos::new(0, 0)), Ok(0));
        assert_eq!(Board::index(Pos::new(7, 0)), Ok(7));
        assert_eq!(Board::index(Pos::new(0, 1)), Ok(8));
        assert_eq!(Board::index(Pos::new(7, 7)), Ok(63));
        assert!(Board::index(Pos::new(8, 0)).is_err());
        assert!(Board::index(Pos::new(0, 8)).is_err());
    }

    #[test]
    fn test_pos_of_inverts_index() {
        for i in 0..GRID_CELLS {
            assert_eq!(Board::index(Board::pos_of(i)), Ok(i));
        }
    }

    #[test]
    fn test_display_roundtrips_through_from_rows() {
        let rows = [
            "RGBYMCRG", "GBYMCRGB", "BYMCRGBY", "YMC#GBYM", "MCRGBYMC", "CRGBYMCR", "RGB.MCRG",
            "GBYMCRGB",
        ];
        let board = Board::from_rows(&rows).unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, rows.to_vec());
    }

    #[test]
    fn test_generate_places_requested_obstacles() {
        let mut source = CandySource::new(42, 6);
        let board = Board::generate(&mut source, 5, 10_000).unwrap();
        assert_eq!(board.count_obstacles(), 5);
        assert_eq!(board.count_empty(), 0);
        assert!(find_matches(&board).is_empty());
    }
}
