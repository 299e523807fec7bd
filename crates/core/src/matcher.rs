//! Match detection - pure scan of rows and columns for runs of three or more
//!
//! Each row is scanned left-to-right and each column top-to-bottom with a run
//! counter. A run breaks on a different kind, an obstacle, an empty cell, or the
//! board edge; a broken run of length >= 3 is emitted whole. Runs are consumed
//! greedily, so a line of five yields one match of length five and a cell appears
//! in at most one horizontal and at most one vertical match per pass.

use crate::board::Board;
use crate::types::{Axis, CandyKind, Pos, GRID_SIZE};

/// Minimum run length that counts as a match.
pub const MIN_MATCH_LEN: u8 = 3;

/// A run of same-kind cells along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub axis: Axis,
    pub kind: CandyKind,
    /// First cell of the run (leftmost or topmost)
    pub start: Pos,
    pub len: u8,
}

impl Match {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cells of the run, in scan order.
    pub fn cells(&self) -> impl Iterator<Item = Pos> {
        let Match {
            axis, start, len, ..
        } = *self;
        (0..len).map(move |i| match axis {
            Axis::Horizontal => Pos::new(start.x + i, start.y),
            Axis::Vertical => Pos::new(start.x, start.y + i),
        })
    }

    pub fn contains(&self, pos: Pos) -> bool {
        match self.axis {
            Axis::Horizontal => {
                pos.y == self.start.y && pos.x >= self.start.x && pos.x < self.start.x + self.len
            }
            Axis::Vertical => {
                pos.x == self.start.x && pos.y >= self.start.y && pos.y < self.start.y + self.len
            }
        }
    }
}

/// Find every match on the board (horizontal matches first, then vertical).
pub fn find_matches(board: &Board) -> Vec<Match> {
    let mut out = Vec::new();
    find_matches_into(board, &mut out);
    out
}

/// Allocation-reusing variant of [`find_matches`]; `out` is cleared first.
pub fn find_matches_into(board: &Board, out: &mut Vec<Match>) {
    out.clear();
    for line in 0..GRID_SIZE {
        scan_line(board, Axis::Horizontal, line, out);
    }
    for line in 0..GRID_SIZE {
        scan_line(board, Axis::Vertical, line, out);
    }
}

/// True when at least one match exists.
pub fn has_match(board: &Board) -> bool {
    let mut out = Vec::new();
    find_matches_into(board, &mut out);
    !out.is_empty()
}

fn scan_line(board: &Board, axis: Axis, line: u8, out: &mut Vec<Match>) {
    let at = |i: u8| match axis {
        Axis::Horizontal => Pos::new(i, line),
        Axis::Vertical => Pos::new(line, i),
    };

    let mut run_start: u8 = 0;
    let mut run_kind: Option<CandyKind> = None;

    // One step past the edge flushes the final run.
    for i in 0..=GRID_SIZE {
        let kind = if i < GRID_SIZE {
            let p = at(i);
            board.kind_at(p.x, p.y)
        } else {
            None
        };

        if kind.is_some() && kind == run_kind {
            continue;
        }

        if let Some(run) = run_kind {
            let len = i - run_start;
            if len >= MIN_MATCH_LEN {
                out.push(Match {
                    axis,
                    kind: run,
                    start: at(run_start),
                    len,
                });
            }
        }

        run_start = i;
        run_kind = kind;
    }
}
