//! Terminal render surface.
//!
//! A small, game-oriented rendering layer: the view draws a
//! [`GameSnapshot`](core::GameSnapshot) through the [`Surface`] trait into a
//! framebuffer, and [`TerminalRenderer`] flushes only the cells that changed.
//!
//! - Rendering stays pure and testable against a plain [`FrameBuffer`]
//! - Cells are 4x2 characters so the square grid looks square
//! - Candy visuals come from a [`Theme`]; anything missing gets a placeholder

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod surface;
pub mod theme;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{CellStyle, FrameBuffer, Pixel, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, for_each_changed_run, TerminalRenderer};
pub use surface::{Rect, Surface, TerminalSurface};
pub use theme::{Sprite, Theme};
