//! Theme: the `kind -> visual` lookup used by the view.
//!
//! A theme file is JSON:
//!
//! ```json
//! {
//!   "candies": {
//!     "red":  { "glyph": "●", "fg": [230, 70, 70] },
//!     "blue": { "glyph": "◆", "fg": [80, 130, 240], "bold": true }
//!   },
//!   "obstacle": { "glyph": "▓", "fg": [120, 120, 130] }
//! }
//! ```
//!
//! Kinds missing from the file are drawn with a placeholder (the kind's
//! initial in its default color). A theme that fails to load is replaced by
//! the built-in one.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fb::Rgb;
use crate::types::CandyKind;

/// Visual for one board cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    /// Repeated across the cell width.
    pub glyph: String,
    pub fg: [u8; 3],
    #[serde(default)]
    pub bold: bool,
}

impl Sprite {
    pub fn new(glyph: &str, fg: [u8; 3]) -> Self {
        Self {
            glyph: glyph.to_string(),
            fg,
            bold: false,
        }
    }

    pub fn fg(&self) -> Rgb {
        Rgb::from_array(self.fg)
    }

    /// First glyph character, or a space for an empty glyph.
    pub fn ch(&self) -> char {
        self.glyph.chars().next().unwrap_or(' ')
    }

    /// Programmatic stand-in for a kind without a themed sprite.
    pub fn placeholder(kind: CandyKind) -> Self {
        let initial = kind
            .as_str()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?');
        Self {
            glyph: initial.to_string(),
            fg: default_color(kind),
            bold: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ThemeFile {
    #[serde(default)]
    candies: HashMap<String, Sprite>,
    #[serde(default)]
    obstacle: Option<Sprite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    candies: [Sprite; CandyKind::COUNT],
    obstacle: Sprite,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            candies: CandyKind::ALL.map(|kind| Sprite::new("●", default_color(kind))),
            obstacle: default_obstacle(),
        }
    }
}

impl Theme {
    pub fn sprite(&self, kind: CandyKind) -> &Sprite {
        &self.candies[kind.index()]
    }

    pub fn obstacle(&self) -> &Sprite {
        &self.obstacle
    }

    /// Parse a theme; unknown kind names are ignored.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: ThemeFile = serde_json::from_str(text).context("invalid theme JSON")?;
        let mut candies = CandyKind::ALL.map(Sprite::placeholder);
        for (name, sprite) in file.candies {
            if let Some(kind) = CandyKind::from_str(&name) {
                candies[kind.index()] = sprite;
            }
        }
        Ok(Self {
            candies,
            obstacle: file.obstacle.unwrap_or_else(default_obstacle),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read theme {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Load `path` if given, falling back to the built-in theme.
    ///
    /// The error, if any, is returned alongside so the caller can report it.
    pub fn load_or_default(path: Option<&Path>) -> (Self, Option<anyhow::Error>) {
        match path.map(Self::from_file) {
            None => (Self::default(), None),
            Some(Ok(theme)) => (theme, None),
            Some(Err(e)) => (Self::default(), Some(e)),
        }
    }
}

fn default_color(kind: CandyKind) -> [u8; 3] {
    match kind {
        CandyKind::Red => [230, 70, 70],
        CandyKind::Green => [90, 210, 110],
        CandyKind::Blue => [80, 130, 240],
        CandyKind::Yellow => [240, 215, 80],
        CandyKind::Magenta => [210, 100, 220],
        CandyKind::Cyan => [80, 215, 220],
    }
}

fn default_obstacle() -> Sprite {
    Sprite::new("▓", [120, 120, 130])
}
