//! Mapping from terminal events to backend-independent input events.

use crate::types::{InputEvent, Key};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Map a key code to an engine key. Unhandled codes return `None`.
pub fn map_key_code(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Map a mouse event; only left-button presses count.
pub fn map_mouse_event(mouse: MouseEvent) -> Option<InputEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown {
            x: mouse.column,
            y: mouse.row,
        }),
        _ => None,
    }
}

/// Map any terminal event. Key releases are ignored.
pub fn map_event(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => {
            if key.kind == KeyEventKind::Release {
                return None;
            }
            if should_quit(*key) {
                return Some(InputEvent::Quit);
            }
            map_key_code(key.code).map(InputEvent::KeyDown)
        }
        Event::Mouse(mouse) => map_mouse_event(*mouse),
        _ => None,
    }
}
