//! GameView: maps a [`GameSnapshot`] onto a [`Surface`].
//!
//! This module is pure (no I/O). It can be unit-tested against a
//! [`FrameBuffer`](crate::fb::FrameBuffer).

use std::fmt::Write;

use arrayvec::ArrayString;

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, Rgb};
use crate::surface::{Rect, Surface};
use crate::theme::Theme;
use crate::types::{BoardLayout, Cell, Overlay, Pos, GRID_SIZE, MILLIROWS_PER_ROW};

const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);
const BOARD_BG: Rgb = Rgb::new(28, 28, 38);
const SELECTED_BG: Rgb = Rgb::new(70, 70, 95);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Draws the board, falling tiles, cursor, side panel and modal overlays.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    theme: Theme,
}

impl Default for GameView {
    fn default() -> Self {
        // 4x2 keeps cells roughly square in common terminal fonts.
        Self::new(4, 2, Theme::default())
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16, theme: Theme) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            theme,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn board_px(&self) -> (u16, u16) {
        (GRID_SIZE as u16 * self.cell_w, GRID_SIZE as u16 * self.cell_h)
    }

    /// Where the board lands in `viewport`; also used to map pointer clicks.
    ///
    /// The board frame is centered vertically and the frame plus side panel
    /// are centered horizontally.
    pub fn layout(&self, viewport: Viewport) -> BoardLayout {
        let (board_w, board_h) = self.board_px();
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;
        let total_w = frame_w + 2 + PANEL_WIDTH;
        let start_x = viewport.width.saturating_sub(total_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;
        BoardLayout {
            origin_x: start_x + 1,
            origin_y: start_y + 1,
            cell_w: self.cell_w,
            cell_h: self.cell_h,
        }
    }

    /// Draw one frame. Does not call [`Surface::present`].
    pub fn render<S: Surface + ?Sized>(&self, snap: &GameSnapshot, surface: &mut S) {
        let (width, height) = surface.size();
        let layout = self.layout(Viewport::new(width, height));
        let (board_w, board_h) = self.board_px();

        surface.clear(SCREEN_BG);
        surface.draw_rect(
            Rect::new(layout.origin_x, layout.origin_y, board_w, board_h),
            ' ',
            CellStyle::new(BOARD_BG, BOARD_BG),
        );
        draw_border(
            surface,
            Rect::new(layout.origin_x - 1, layout.origin_y - 1, board_w + 2, board_h + 2),
            CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG),
        );

        for (y, row) in snap.board.iter().enumerate() {
            for (x, &raw) in row.iter().enumerate() {
                let pos = Pos::new(x as u8, y as u8);
                let bg = if snap.selected == Some(pos) {
                    SELECTED_BG
                } else {
                    BOARD_BG
                };
                self.draw_cell(surface, &layout, pos, Cell::from_u8(raw), bg);
            }
        }

        self.draw_falling(surface, &layout, snap);

        if snap.playable() {
            self.draw_cursor(surface, &layout, snap.cursor);
        }

        self.draw_side_panel(surface, &layout, snap);
        self.draw_overlay(surface, &layout, &snap.overlay);
    }

    fn cell_rect(&self, layout: &BoardLayout, pos: Pos) -> Rect {
        Rect::new(
            layout.origin_x + pos.x as u16 * self.cell_w,
            layout.origin_y + pos.y as u16 * self.cell_h,
            self.cell_w,
            self.cell_h,
        )
    }

    fn draw_cell<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &BoardLayout,
        pos: Pos,
        cell: Cell,
        bg: Rgb,
    ) {
        let rect = self.cell_rect(layout, pos);
        match cell {
            Cell::Candy(kind) => surface.draw_image(rect, self.theme.sprite(kind), bg),
            Cell::Obstacle => surface.draw_image(rect, self.theme.obstacle(), bg),
            Cell::Empty => surface.draw_rect(
                rect,
                '·',
                CellStyle::new(Rgb::new(80, 80, 95), bg).dim(),
            ),
        }
    }

    /// Falling tiles are drawn row by row so tiles entering from above the
    /// board are clipped at its top edge.
    fn draw_falling<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &BoardLayout,
        snap: &GameSnapshot,
    ) {
        let board_h = i32::from(self.board_px().1);
        for tile in &snap.falling {
            let top = (tile.y_milli * i32::from(self.cell_h)).div_euclid(MILLIROWS_PER_ROW);
            let x = layout.origin_x + u16::from(tile.column) * self.cell_w;
            let sprite = self.theme.sprite(tile.kind);
            for dy in 0..i32::from(self.cell_h) {
                let row = top + dy;
                if !(0..board_h).contains(&row) {
                    continue;
                }
                let rect = Rect::new(x, layout.origin_y + row as u16, self.cell_w, 1);
                surface.draw_image(rect, sprite, BOARD_BG);
            }
        }
    }

    fn draw_cursor<S: Surface + ?Sized>(&self, surface: &mut S, layout: &BoardLayout, cursor: Pos) {
        if !cursor.in_bounds() {
            return;
        }
        let rect = self.cell_rect(layout, cursor);
        let style = CellStyle::new(Rgb::new(255, 255, 255), BOARD_BG).bold();
        let right = rect.x + rect.w - 1;
        for dy in 0..rect.h {
            surface.draw_text(rect.x, rect.y + dy, "[", style);
            surface.draw_text(right, rect.y + dy, "]", style);
        }
    }

    fn draw_side_panel<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &BoardLayout,
        snap: &GameSnapshot,
    ) {
        let (width, height) = surface.size();
        let panel_x = layout.origin_x + self.board_px().0 + 3;
        if panel_x.saturating_add(PANEL_WIDTH) > width {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
        let warn = CellStyle::new(Rgb::new(240, 120, 90), SCREEN_BG).bold();

        let time_secs = snap.time_remaining_secs();
        let entries: [(&str, Stat, bool); 7] = [
            ("SCORE", Stat::One(u64::from(snap.score)), false),
            ("TOTAL", Stat::One(u64::from(snap.total_score)), false),
            ("TARGET", Stat::One(u64::from(snap.target_score)), false),
            ("LEVEL", Stat::One(u64::from(snap.level)), false),
            (
                "MOVES",
                Stat::OutOf(snap.moves_remaining, snap.move_limit),
                snap.moves_remaining <= 3,
            ),
            ("TIME", Stat::Secs(time_secs), time_secs <= 10),
            ("BEST", Stat::One(u64::from(snap.highscore)), false),
        ];

        let mut y = layout.origin_y.saturating_sub(1);
        let mut text = Line::new();
        for (name, stat, low) in entries {
            if y.saturating_add(1) >= height {
                break;
            }
            text.clear();
            let _ = match stat {
                Stat::One(v) => write!(text, "{v}"),
                Stat::OutOf(a, b) => write!(text, "{a} / {b}"),
                Stat::Secs(s) => write!(text, "{s}s"),
            };
            surface.draw_text(panel_x, y, name, label);
            surface.draw_text(panel_x, y + 1, &text, if low { warn } else { value });
            y = y.saturating_add(2);
        }
    }

    fn draw_overlay<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &BoardLayout,
        overlay: &Overlay,
    ) {
        let mut lines = [Line::new(), Line::new(), Line::new(), Line::new()];
        let _ = match *overlay {
            Overlay::None => return,
            Overlay::LevelComplete {
                level,
                next_move_limit,
                next_time_limit_secs,
            } => {
                let _ = write!(lines[0], "LEVEL {level} COMPLETE");
                let _ = write!(lines[1], "NEXT {next_move_limit} MOVES {next_time_limit_secs}s");
                lines[3].write_str("C: CONTINUE")
            }
            Overlay::GameOver {
                total_score,
                new_highscore,
            } => {
                let _ = lines[0].write_str("GAME OVER");
                let _ = write!(lines[1], "TOTAL {total_score}");
                if new_highscore {
                    let _ = lines[2].write_str("NEW HIGHSCORE!");
                }
                lines[3].write_str("R: RESTART  Q: QUIT")
            }
        };

        let (board_w, board_h) = self.board_px();
        let box_w = lines
            .iter()
            .map(|l| l.chars().count() as u16)
            .max()
            .unwrap_or(0)
            .saturating_add(4)
            .min(board_w);
        let box_h = lines.len() as u16 + 2;
        let box_x = layout.origin_x + board_w.saturating_sub(box_w) / 2;
        let box_y = layout.origin_y + board_h.saturating_sub(box_h) / 2;

        let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        surface.draw_rect(Rect::new(box_x, box_y, box_w, box_h), ' ', style);
        draw_border(surface, Rect::new(box_x, box_y, box_w, box_h), style);
        for (i, line) in lines.iter().enumerate() {
            let w = line.chars().count() as u16;
            let x = box_x + box_w.saturating_sub(w) / 2;
            surface.draw_text(x, box_y + 1 + i as u16, line, style);
        }
    }
}

/// Columns reserved right of the board frame for the stats panel.
const PANEL_WIDTH: u16 = 12;

/// Stack-allocated text for one panel or overlay line.
type Line = ArrayString<32>;

#[derive(Clone, Copy)]
enum Stat {
    One(u64),
    OutOf(u32, u32),
    Secs(u64),
}

fn draw_border<S: Surface + ?Sized>(surface: &mut S, r: Rect, style: CellStyle) {
    if r.w < 2 || r.h < 2 {
        return;
    }
    let right = r.x + r.w - 1;
    let bottom = r.y + r.h - 1;

    surface.draw_rect(Rect::new(r.x + 1, r.y, r.w - 2, 1), '─', style);
    surface.draw_rect(Rect::new(r.x + 1, bottom, r.w - 2, 1), '─', style);
    surface.draw_rect(Rect::new(r.x, r.y + 1, 1, r.h - 2), '│', style);
    surface.draw_rect(Rect::new(right, r.y + 1, 1, r.h - 2), '│', style);
    surface.draw_text(r.x, r.y, "┌", style);
    surface.draw_text(right, r.y, "┐", style);
    surface.draw_text(r.x, bottom, "└", style);
    surface.draw_text(right, bottom, "┘", style);
}
