//! Session engine - level flow, difficulty feedback, persistence and journaling.
//!
//! [`Session`] wraps a [`GameState`](core::GameState) and drives everything
//! around the board simulation: cursor and selection, level completion and
//! game over, the difficulty adapter, highscore persistence through a
//! [`ProfileStore`](store::ProfileStore), and the optional JSON-lines
//! [`Journal`].

pub mod config;
pub mod controls;
pub mod journal;
pub mod session;

pub use tui_match3_core as core;
pub use tui_match3_store as store;
pub use tui_match3_types as types;

pub use config::SessionConfig;
pub use controls::action_for_key;
pub use journal::{GameOverReason, Journal, JournalEvent, MoveOutcomeKind};
pub use session::{Phase, Session};
