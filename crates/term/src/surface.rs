//! The drawing interface the view renders through.

use anyhow::Result;

use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::renderer::TerminalRenderer;
use crate::theme::Sprite;

/// Axis-aligned rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }
}

pub trait Surface {
    /// `(width, height)` in cells.
    fn size(&self) -> (u16, u16);

    fn clear(&mut self, bg: Rgb);

    fn draw_rect(&mut self, rect: Rect, ch: char, style: CellStyle);

    /// Fill `rect` with the sprite's glyph on `bg`.
    fn draw_image(&mut self, rect: Rect, sprite: &Sprite, bg: Rgb);

    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: CellStyle);

    /// Make everything drawn since the last call visible.
    fn present(&mut self) -> Result<()>;
}

impl Surface for FrameBuffer {
    fn size(&self) -> (u16, u16) {
        (self.width(), self.height())
    }

    fn clear(&mut self, bg: Rgb) {
        self.fill(CellStyle::new(Rgb::default(), bg).pixel(' '));
    }

    fn draw_rect(&mut self, rect: Rect, ch: char, style: CellStyle) {
        self.fill_rect(rect.x, rect.y, rect.w, rect.h, ch, style);
    }

    fn draw_image(&mut self, rect: Rect, sprite: &Sprite, bg: Rgb) {
        let mut style = CellStyle::new(sprite.fg(), bg);
        if sprite.bold {
            style = style.bold();
        }
        for dy in 0..rect.h {
            let mut glyph = sprite.glyph.chars().cycle();
            for dx in 0..rect.w {
                let ch = glyph.next().unwrap_or(' ');
                self.put_char(rect.x.saturating_add(dx), rect.y.saturating_add(dy), ch, style);
            }
        }
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: CellStyle) {
        self.put_str(x, y, text, style);
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A framebuffer that flushes to the real terminal on `present`.
pub struct TerminalSurface {
    fb: FrameBuffer,
    renderer: TerminalRenderer,
}

impl TerminalSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            fb: FrameBuffer::new(width, height),
            renderer: TerminalRenderer::new(),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.renderer.exit()
    }

    /// Match the terminal size; a change forces a full redraw.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) != self.fb.size() {
            self.fb.resize(width, height);
            self.renderer.invalidate();
        }
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (u16, u16) {
        self.fb.size()
    }

    fn clear(&mut self, bg: Rgb) {
        self.fb.clear(bg);
    }

    fn draw_rect(&mut self, rect: Rect, ch: char, style: CellStyle) {
        self.fb.draw_rect(rect, ch, style);
    }

    fn draw_image(&mut self, rect: Rect, sprite: &Sprite, bg: Rgb) {
        self.fb.draw_image(rect, sprite, bg);
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: CellStyle) {
        self.fb.draw_text(x, y, text, style);
    }

    fn present(&mut self) -> Result<()> {
        self.renderer.draw_swap(&mut self.fb)
    }
}
