//! Player profile persistence.
//!
//! The profile is a single JSON object:
//!
//! ```json
//! {"name": "player", "highscore": 4200}
//! ```
//!
//! A missing file is not an error ([`ProfileStore::try_load`] returns `Ok(None)`).
//! A corrupt or unreadable file is reported by `try_load` and degrades to
//! `None` through [`ProfileStore::load`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default profile file, relative to the working directory.
pub const DEFAULT_PROFILE_PATH: &str = "match3_profile.json";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub highscore: u32,
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            highscore: 0,
        }
    }

    /// Raise the highscore to `total_score` if it beats it.
    ///
    /// Returns `true` when the highscore changed.
    pub fn record_score(&mut self, total_score: u32) -> bool {
        if total_score > self.highscore {
            self.highscore = total_score;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("profile i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("profile {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable storage for the player profile.
pub trait ProfileStore {
    /// Read the stored profile. `Ok(None)` when nothing has been saved yet.
    fn try_load(&self) -> Result<Option<PlayerProfile>, StoreError>;

    fn save(&mut self, profile: &PlayerProfile) -> Result<(), StoreError>;

    /// Read the stored profile, treating any failure as "no profile".
    fn load(&self) -> Option<PlayerProfile> {
        self.try_load().ok().flatten()
    }
}

/// Profile stored as a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ProfileStore for JsonFileStore {
    fn try_load(&self) -> Result<Option<PlayerProfile>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&mut self, profile: &PlayerProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Write a sibling file first so a crash never leaves a half-written profile.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

/// In-memory store, for tests and headless runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    profile: Option<PlayerProfile>,
    saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: PlayerProfile) -> Self {
        Self {
            profile: Some(profile),
            saves: 0,
        }
    }

    /// Number of successful `save` calls.
    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl ProfileStore for MemoryStore {
    fn try_load(&self) -> Result<Option<PlayerProfile>, StoreError> {
        Ok(self.profile.clone())
    }

    fn save(&mut self, profile: &PlayerProfile) -> Result<(), StoreError> {
        self.profile = Some(profile.clone());
        self.saves += 1;
        Ok(())
    }
}

impl<S: ProfileStore + ?Sized> ProfileStore for Box<S> {
    fn try_load(&self) -> Result<Option<PlayerProfile>, StoreError> {
        (**self).try_load()
    }

    fn save(&mut self, profile: &PlayerProfile) -> Result<(), StoreError> {
        (**self).save(profile)
    }
}
