//! Per-frame input sources.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use arrayvec::ArrayVec;
use crossterm::event;

use crate::map::map_event;
use crate::types::InputEvent;

/// Upper bound on events delivered per frame; extra events wait for the next poll.
pub const MAX_EVENTS_PER_POLL: usize = 32;

pub type EventBatch = ArrayVec<InputEvent, MAX_EVENTS_PER_POLL>;

/// Anything that yields the input events of one frame.
pub trait InputSource {
    /// Wait up to `timeout` for input, then return every pending event.
    fn poll(&mut self, timeout: Duration) -> Result<EventBatch>;
}

/// Reads crossterm events from the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self, timeout: Duration) -> Result<EventBatch> {
        let mut batch = EventBatch::new();
        if !event::poll(timeout)? {
            return Ok(batch);
        }

        loop {
            let ev = event::read()?;
            if let Some(mapped) = map_event(&ev) {
                batch.push(mapped);
            }
            if batch.is_full() || !event::poll(Duration::ZERO)? {
                break;
            }
        }
        Ok(batch)
    }
}

/// Replays prepared frames of events; used by tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one frame of events.
    pub fn push_frame(&mut self, events: impl IntoIterator<Item = InputEvent>) -> &mut Self {
        self.frames.push_back(events.into_iter().collect());
        self
    }

    pub fn remaining_frames(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _timeout: Duration) -> Result<EventBatch> {
        let mut batch = EventBatch::new();
        if let Some(frame) = self.frames.pop_front() {
            let mut rest = frame.into_iter();
            for ev in rest.by_ref().take(MAX_EVENTS_PER_POLL) {
                batch.push(ev);
            }
            let rest: Vec<InputEvent> = rest.collect();
            if !rest.is_empty() {
                self.frames.push_front(rest);
            }
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Key;

    #[test]
    fn test_scripted_frames_in_order() {
        let mut input = ScriptedInput::new();
        input
            .push_frame([InputEvent::KeyDown(Key::Right)])
            .push_frame(Vec::<InputEvent>::new())
            .push_frame([InputEvent::Quit]);

        let first = input.poll(Duration::ZERO).unwrap();
        assert_eq!(first.as_slice(), &[InputEvent::KeyDown(Key::Right)]);
        assert!(input.poll(Duration::ZERO).unwrap().is_empty());
        assert_eq!(input.poll(Duration::ZERO).unwrap().as_slice(), &[InputEvent::Quit]);
        assert!(input.poll(Duration::ZERO).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_frame_spills_over() {
        let mut input = ScriptedInput::new();
        input.push_frame((0..40).map(|i| InputEvent::PointerDown { x: i, y: 0 }));

        assert_eq!(input.poll(Duration::ZERO).unwrap().len(), MAX_EVENTS_PER_POLL);
        assert_eq!(input.remaining_frames(), 1);
        assert_eq!(input.poll(Duration::ZERO).unwrap().len(), 40 - MAX_EVENTS_PER_POLL);
    }
}
