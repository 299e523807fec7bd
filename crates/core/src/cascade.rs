//! Cascade resolver - settles the board after a successful swap
//!
//! One settle is a small state machine driven by [`CascadeResolver::step`]:
//!
//! ```text
//! Scanning -> Resolving -> Falling -> Scanning -> ... -> Idle
//! ```
//!
//! - **Scanning**: run the match detector; no matches ends the settle (`Idle`).
//! - **Resolving**: score every match, union the matched cells and clear them.
//!   Obstacles are never cleared.
//! - **Falling**: compact each column segment (the run of cells between
//!   obstacles) downward and spawn fresh candy for the vacated top slots. Every
//!   moved or spawned tile becomes a [`FallingTile`] descending at a constant
//!   speed; it is written to the board exactly when it reaches its target row.
//!
//! Scanning and Resolving are instantaneous; only Falling consumes time.
//! Each Resolving entry counts as a round; exceeding the round cap yields
//! [`CascadeError::Runaway`].

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::error::CascadeError;
use crate::level::LevelState;
use crate::matcher::{find_matches_into, Match};
use crate::rng::CandySource;
use crate::scoring::calculate_score;
use crate::types::{CandyKind, Cell, Pos, GRID_CELLS, GRID_SIZE, MILLIROWS_PER_ROW};

/// Phase of the settle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadePhase {
    Idle,
    Scanning,
    Resolving,
    Falling,
}

/// A tile in transit to its target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingTile {
    pub column: u8,
    /// Row the tile started from; negative for tiles spawned above the segment.
    pub origin_y: i32,
    pub target_row: u8,
    pub kind: CandyKind,
    /// Current vertical position in milli-rows.
    pub y_milli: i32,
}

impl FallingTile {
    pub fn new(column: u8, origin_y: i32, target_row: u8, kind: CandyKind) -> Self {
        Self {
            column,
            origin_y,
            target_row,
            kind,
            y_milli: origin_y * MILLIROWS_PER_ROW,
        }
    }

    pub fn target_milli(&self) -> i32 {
        self.target_row as i32 * MILLIROWS_PER_ROW
    }

    pub fn has_arrived(&self) -> bool {
        self.y_milli >= self.target_milli()
    }

    /// Move down by `delta` milli-rows, stopping at the target.
    fn advance(&mut self, delta: i64) {
        let next = (self.y_milli as i64).saturating_add(delta);
        self.y_milli = next.min(self.target_milli() as i64) as i32;
    }
}

/// Totals for the settle in progress (or the last finished one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeSummary {
    pub rounds: u32,
    pub matches: u32,
    pub cleared: u32,
    pub points: u32,
    pub longest: u8,
}

#[derive(Debug, Clone)]
pub struct CascadeResolver {
    phase: CascadePhase,
    pending: Vec<Match>,
    falling: ArrayVec<FallingTile, GRID_CELLS>,
    summary: CascadeSummary,
    round_cap: u32,
    fall_speed: u32,
}

impl CascadeResolver {
    /// `fall_speed` is in milli-rows per millisecond.
    pub fn new(round_cap: u32, fall_speed: u32) -> Self {
        Self {
            phase: CascadePhase::Idle,
            pending: Vec::new(),
            falling: ArrayVec::new(),
            summary: CascadeSummary::default(),
            round_cap,
            fall_speed: fall_speed.max(1),
        }
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == CascadePhase::Idle
    }

    pub fn falling(&self) -> &[FallingTile] {
        &self.falling
    }

    pub fn summary(&self) -> CascadeSummary {
        self.summary
    }

    /// Drop any settle in progress.
    pub fn reset(&mut self) {
        self.phase = CascadePhase::Idle;
        self.pending.clear();
        self.falling.clear();
        self.summary = CascadeSummary::default();
    }

    /// Start a settle from matches already found by the caller.
    pub fn begin(&mut self, matches: Vec<Match>) {
        self.reset();
        if matches.is_empty() {
            self.phase = CascadePhase::Scanning;
        } else {
            self.pending = matches;
            self.phase = CascadePhase::Resolving;
        }
    }

    /// Run the Scanning step on its own.
    ///
    /// A stable board leaves the resolver idle and the board untouched.
    /// Returns `true` when matches were found and Resolving is next.
    /// Has no effect while tiles are resolving or falling.
    pub fn scan(&mut self, board: &Board) -> bool {
        match self.phase {
            CascadePhase::Idle | CascadePhase::Scanning => {
                find_matches_into(board, &mut self.pending);
                if self.pending.is_empty() {
                    self.phase = CascadePhase::Idle;
                    false
                } else {
                    self.phase = CascadePhase::Resolving;
                    true
                }
            }
            CascadePhase::Resolving => true,
            CascadePhase::Falling => false,
        }
    }

    /// Advance the settle by `elapsed_ms` of game time.
    ///
    /// Instant phases run back to back; the elapsed time is spent on at most
    /// one Falling phase, so a single step never covers two rounds.
    pub fn step(
        &mut self,
        board: &mut Board,
        level: &mut LevelState,
        source: &mut CandySource,
        elapsed_ms: u32,
    ) -> Result<(), CascadeError> {
        let mut time_spent = false;
        loop {
            match self.phase {
                CascadePhase::Idle => return Ok(()),
                CascadePhase::Scanning => {
                    if !self.scan(board) {
                        return Ok(());
                    }
                }
                CascadePhase::Resolving => {
                    self.summary.rounds += 1;
                    if self.summary.rounds > self.round_cap {
                        let rounds = self.summary.rounds;
                        self.pending.clear();
                        self.falling.clear();
                        self.phase = CascadePhase::Idle;
                        return Err(CascadeError::Runaway { rounds });
                    }
                    self.resolve(board, level)?;
                    self.apply_gravity(board, source)?;
                    self.phase = if self.falling.is_empty() {
                        CascadePhase::Scanning
                    } else {
                        CascadePhase::Falling
                    };
                }
                CascadePhase::Falling => {
                    if time_spent {
                        return Ok(());
                    }
                    time_spent = true;
                    self.advance_falling(board, elapsed_ms)?;
                    if !self.falling.is_empty() {
                        return Ok(());
                    }
                    self.phase = CascadePhase::Scanning;
                }
            }
        }
    }

    /// Step until the board is settled, skipping the falling animation.
    pub fn run_to_idle(
        &mut self,
        board: &mut Board,
        level: &mut LevelState,
        source: &mut CandySource,
    ) -> Result<CascadeSummary, CascadeError> {
        while !self.is_idle() {
            self.step(board, level, source, u32::MAX)?;
        }
        Ok(self.summary)
    }

    fn resolve(&mut self, board: &mut Board, level: &mut LevelState) -> Result<(), CascadeError> {
        let score = calculate_score(&self.pending);
        level.add_points(score.total);

        self.summary.matches += score.matches;
        self.summary.points = self.summary.points.saturating_add(score.total);
        self.summary.longest = self.summary.longest.max(score.longest);

        // A cell can sit in both a horizontal and a vertical match.
        let mut marked = [false; GRID_CELLS];
        for m in &self.pending {
            for pos in m.cells().filter(|p| p.in_bounds()) {
                marked[pos.y as usize * GRID_SIZE as usize + pos.x as usize] = true;
            }
        }

        for (idx, _) in marked.iter().enumerate().filter(|(_, m)| **m) {
            let pos = Board::pos_of(idx);
            if board.get(pos)?.is_candy() {
                board.set(pos, Cell::Empty)?;
                self.summary.cleared += 1;
            }
        }

        self.pending.clear();
        Ok(())
    }

    fn apply_gravity(&mut self, board: &mut Board, source: &mut CandySource) -> Result<(), CascadeError> {
        for x in 0..GRID_SIZE {
            let mut bottom = GRID_SIZE as i32 - 1;
            while bottom >= 0 {
                if board.get(Pos::new(x, bottom as u8))?.is_obstacle() {
                    bottom -= 1;
                    continue;
                }
                let mut top = bottom;
                while top > 0 && !board.get(Pos::new(x, (top - 1) as u8))?.is_obstacle() {
                    top -= 1;
                }
                self.settle_segment(board, source, x, top, bottom)?;
                bottom = top - 1;
            }
        }
        Ok(())
    }

    /// Compact rows `top..=bottom` of column `x` (no obstacles inside) and
    /// spawn candy for the slots left at the top.
    fn settle_segment(
        &mut self,
        board: &mut Board,
        source: &mut CandySource,
        x: u8,
        top: i32,
        bottom: i32,
    ) -> Result<(), CascadeError> {
        let mut write = bottom;
        for row in (top..=bottom).rev() {
            let pos = Pos::new(x, row as u8);
            let Some(kind) = board.get(pos)?.kind() else {
                continue;
            };
            if row != write {
                board.set(pos, Cell::Empty)?;
                self.falling.push(FallingTile::new(x, row, write as u8, kind));
            }
            write -= 1;
        }

        let vacated = write - top + 1;
        for row in top..=write {
            let kind = source.next_kind();
            self.falling.push(FallingTile::new(x, row - vacated, row as u8, kind));
        }
        Ok(())
    }

    fn advance_falling(&mut self, board: &mut Board, elapsed_ms: u32) -> Result<(), CascadeError> {
        let delta = elapsed_ms as i64 * self.fall_speed as i64;
        for tile in self.falling.iter_mut() {
            tile.advance(delta);
        }

        let mut i = 0;
        while i < self.falling.len() {
            let tile = self.falling[i];
            if tile.has_arrived() {
                board.set(Pos::new(tile.column, tile.target_row), Cell::Candy(tile.kind))?;
                self.falling.swap_remove(i);
            } else {
                i += 1;
            }
        }
        Ok(())
    }
}

impl Default for CascadeResolver {
    fn default() -> Self {
        Self::new(
            crate::types::CASCADE_ITERATION_CAP,
            crate::types::FALL_SPEED_MILLIROWS_PER_MS,
        )
    }
}
