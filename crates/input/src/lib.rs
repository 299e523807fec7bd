//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key and mouse events into [`crate::types::InputEvent`] and
//! delivers them once per frame through an [`InputSource`].

pub mod map;
pub mod source;

pub use tui_match3_types as types;

pub use map::{map_event, map_key_code, should_quit};
pub use source::{EventBatch, InputSource, ScriptedInput, TerminalInput, MAX_EVENTS_PER_POLL};
