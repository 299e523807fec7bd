//! Session journal - opt-in JSON-lines event log.
//!
//! Every record is one JSON object per line:
//!
//! ```json
//! {"seq":3,"ts":5120,"event":"move","level":1,"from":[2,0],"to":[3,0],"outcome":"matched","moves_remaining":19}
//! ```
//!
//! `ts` is game-clock milliseconds. When the sink fails to write, journaling
//! stops for the rest of the session; gameplay never depends on it.

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::types::Pos;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    SessionStarted {
        seed: u32,
        player: String,
        highscore: u32,
    },
    LevelStarted {
        level: u32,
        move_limit: u32,
        time_limit_secs: u32,
        obstacles: u8,
    },
    Move {
        level: u32,
        from: [u8; 2],
        to: [u8; 2],
        outcome: MoveOutcomeKind,
        moves_remaining: u32,
    },
    CascadeSettled {
        level: u32,
        rounds: u32,
        matches: u32,
        points: u32,
    },
    LevelCompleted {
        level: u32,
        score: u32,
        total_score: u32,
        moves_used: u32,
        time_used_secs: f64,
    },
    DifficultyTrained {
        samples: usize,
        move_limit: u32,
        time_limit_secs: u32,
    },
    GameOver {
        level: u32,
        total_score: u32,
        reason: GameOverReason,
        new_highscore: bool,
    },
    CascadeRunaway {
        level: u32,
        rounds: u32,
    },
    ProfileSaved {
        name: String,
        highscore: u32,
    },
    ProfileLoadFailed {
        error: String,
    },
    ProfileSaveFailed {
        error: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcomeKind {
    Matched,
    Reverted,
    NotAdjacent,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    OutOfMoves,
    OutOfTime,
}

#[derive(Serialize)]
struct Record<'a> {
    seq: u64,
    ts: u64,
    #[serde(flatten)]
    event: &'a JournalEvent,
}

enum Sink {
    Disabled,
    File(LineWriter<File>),
    Memory(Vec<String>),
}

pub struct Journal {
    sink: Sink,
    seq: u64,
    buf: Vec<u8>,
}

impl Journal {
    pub fn disabled() -> Self {
        Self::with_sink(Sink::Disabled)
    }

    /// Keep records in memory (see [`Journal::lines`]).
    pub fn memory() -> Self {
        Self::with_sink(Sink::Memory(Vec::new()))
    }

    /// Append to the file at `path`, creating it if needed.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::with_sink(Sink::File(LineWriter::new(file))))
    }

    fn with_sink(sink: Sink) -> Self {
        Self {
            sink,
            seq: 0,
            buf: Vec::with_capacity(256),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.sink, Sink::Disabled)
    }

    /// Lines recorded by a memory journal; empty for other sinks.
    pub fn lines(&self) -> &[String] {
        match &self.sink {
            Sink::Memory(lines) => lines,
            _ => &[],
        }
    }

    pub fn record(&mut self, ts: u64, event: &JournalEvent) {
        if !self.is_enabled() {
            return;
        }

        self.seq += 1;
        self.buf.clear();
        let record = Record {
            seq: self.seq,
            ts,
            event,
        };
        if serde_json::to_writer(&mut self.buf, &record).is_err() {
            return;
        }

        let failed = match &mut self.sink {
            Sink::Disabled => false,
            Sink::File(file) => file
                .write_all(&self.buf)
                .and_then(|_| file.write_all(b"\n"))
                .is_err(),
            Sink::Memory(lines) => {
                lines.push(String::from_utf8_lossy(&self.buf).into_owned());
                false
            }
        };
        if failed {
            self.sink = Sink::Disabled;
        }
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sink = match self.sink {
            Sink::Disabled => "disabled",
            Sink::File(_) => "file",
            Sink::Memory(_) => "memory",
        };
        f.debug_struct("Journal")
            .field("sink", &sink)
            .field("seq", &self.seq)
            .finish()
    }
}

/// `[x, y]` pair used in records.
pub fn pos_pair(pos: Pos) -> [u8; 2] {
    [pos.x, pos.y]
}
