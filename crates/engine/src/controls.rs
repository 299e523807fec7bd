//! Key mapping from backend-independent keys to game actions.

use crate::types::{Direction, GameAction, Key};

/// Map a key press to a game action.
///
/// Arrows, `hjkl` and `wasd` move the cursor; Space/Enter select; Esc drops
/// the selection. The session decides what an action means in its current
/// phase (for example, Select also continues past a level-complete screen).
pub fn action_for_key(key: Key) -> Option<GameAction> {
    match key {
        Key::Up | Key::Char('k') | Key::Char('K') | Key::Char('w') | Key::Char('W') => {
            Some(GameAction::MoveCursor(Direction::Up))
        }
        Key::Down | Key::Char('j') | Key::Char('J') | Key::Char('s') | Key::Char('S') => {
            Some(GameAction::MoveCursor(Direction::Down))
        }
        Key::Left | Key::Char('h') | Key::Char('H') | Key::Char('a') | Key::Char('A') => {
            Some(GameAction::MoveCursor(Direction::Left))
        }
        Key::Right | Key::Char('l') | Key::Char('L') | Key::Char('d') | Key::Char('D') => {
            Some(GameAction::MoveCursor(Direction::Right))
        }

        Key::Enter | Key::Space => Some(GameAction::Select),
        Key::Esc => Some(GameAction::Deselect),

        Key::Char('c') | Key::Char('C') | Key::Char('n') | Key::Char('N') => {
            Some(GameAction::Continue)
        }
        Key::Char('r') | Key::Char('R') => Some(GameAction::Restart),
        Key::Char('q') | Key::Char('Q') => Some(GameAction::Quit),

        _ => None,
    }
}
