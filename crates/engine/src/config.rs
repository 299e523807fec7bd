//! Session configuration read from the environment.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::GameConfig;
use crate::store::DEFAULT_PROFILE_PATH;
use crate::types::{CandyKind, DEFAULT_FPS, MAX_FPS, MIN_FPS};

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub seed: u32,
    pub player_name: String,
    pub profile_path: PathBuf,
    /// JSON-lines journal; journaling is off when `None`.
    pub log_path: Option<PathBuf>,
    /// Optional glyph theme (JSON).
    pub theme_path: Option<PathBuf>,
    pub fps: u32,
    pub game: GameConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            player_name: "player".to_string(),
            profile_path: PathBuf::from(DEFAULT_PROFILE_PATH),
            log_path: None,
            theme_path: None,
            fps: DEFAULT_FPS,
            game: GameConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `MATCH3_SEED` | derived from the system clock |
    /// | `MATCH3_PLAYER` | `player` |
    /// | `MATCH3_PROFILE_PATH` | `match3_profile.json` |
    /// | `MATCH3_LOG_PATH` | unset (no journal) |
    /// | `MATCH3_THEME_PATH` | unset (built-in theme) |
    /// | `MATCH3_FPS` | 30, clamped to 30..=60 |
    /// | `MATCH3_KINDS` | 6, clamped to 3..=6 |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SessionConfig::from_env`] with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };
        let defaults = Self::default();

        let seed = var("MATCH3_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(clock_seed);

        let player_name = var("MATCH3_PLAYER").unwrap_or(defaults.player_name);
        let profile_path = var("MATCH3_PROFILE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.profile_path);
        let log_path = var("MATCH3_LOG_PATH").map(PathBuf::from);
        let theme_path = var("MATCH3_THEME_PATH").map(PathBuf::from);

        let fps = var("MATCH3_FPS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_FPS)
            .clamp(MIN_FPS, MAX_FPS);

        let kinds = var("MATCH3_KINDS")
            .and_then(|s| s.parse::<u8>().ok())
            .unwrap_or(CandyKind::COUNT as u8)
            .clamp(3, CandyKind::COUNT as u8);

        Self {
            seed,
            player_name,
            profile_path,
            log_path,
            theme_path,
            fps,
            game: GameConfig {
                kinds,
                ..defaults.game
            },
        }
    }

    /// Frame duration in milliseconds.
    pub fn frame_ms(&self) -> u32 {
        1000 / self.fps.clamp(MIN_FPS, MAX_FPS)
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SessionConfig::from_lookup(lookup(&[]));
        assert_eq!(config.player_name, "player");
        assert_eq!(config.profile_path, PathBuf::from("match3_profile.json"));
        assert_eq!(config.log_path, None);
        assert_eq!(config.fps, 30);
        assert_eq!(config.game.kinds, 6);
        assert_eq!(config.frame_ms(), 33);
    }

    #[test]
    fn test_values_are_read_and_clamped() {
        let config = SessionConfig::from_lookup(lookup(&[
            ("MATCH3_SEED", "777"),
            ("MATCH3_PLAYER", "ada"),
            ("MATCH3_LOG_PATH", " /tmp/match3.jsonl "),
            ("MATCH3_FPS", "240"),
            ("MATCH3_KINDS", "2"),
        ]));
        assert_eq!(config.seed, 777);
        assert_eq!(config.player_name, "ada");
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/match3.jsonl")));
        assert_eq!(config.fps, 60);
        assert_eq!(config.game.kinds, 3);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = SessionConfig::from_lookup(lookup(&[
            ("MATCH3_LOG_PATH", "   "),
            ("MATCH3_FPS", "fast"),
        ]));
        assert_eq!(config.log_path, None);
        assert_eq!(config.fps, 30);
    }

    #[test]
    fn test_from_env_does_not_panic() {
        let _config = SessionConfig::from_env();
    }
}
