use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::games::breakout::BreakoutConfig;
use crate::games::pacman::PacmanConfig;
use crate::games::pong::PongConfig;
use crate::games::snake::SnakeConfig;
use crate::games::space_invaders::InvadersConfig;
use crate::games::tetris::TetrisConfig;
use crate::session::GameKind;

const CONFIG_ENV: &str = "HEXCADE_CONFIG";
const CONFIG_FILE: &str = "hexcade.json";

/// Tuning for every game plus host timing. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// Host redraw and input poll period
    pub frame_ms: u64,
    pub snake: SnakeConfig,
    pub tetris: TetrisConfig,
    pub pong: PongConfig,
    pub breakout: BreakoutConfig,
    pub invaders: InvadersConfig,
    pub pacman: PacmanConfig,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            frame_ms: 16,
            snake: SnakeConfig::default(),
            tetris: TetrisConfig::default(),
            pong: PongConfig::default(),
            breakout: BreakoutConfig::default(),
            invaders: InvadersConfig::default(),
            pacman: PacmanConfig::default(),
        }
    }
}

impl ArcadeConfig {
    /// Load from `$HEXCADE_CONFIG` or `hexcade.json` beside the executable.
    /// Falls back to defaults when the file is missing or broken.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(CONFIG_FILE);
            }
        }
        PathBuf::from(CONFIG_FILE)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self, kind: GameKind) -> Result<(), ConfigError> {
        match kind {
            GameKind::Snake => self.snake.validate(),
            GameKind::Tetris => self.tetris.validate(),
            GameKind::Pong => self.pong.validate(),
            GameKind::Breakout => self.breakout.validate(),
            GameKind::SpaceInvaders => self.invaders.validate(),
            GameKind::Pacman => self.pacman.validate(),
        }
    }

    /// Logical step length for `kind`.
    pub fn tick_interval(&self, kind: GameKind) -> Duration {
        let ms = match kind {
            GameKind::Snake => self.snake.tick_ms,
            GameKind::Tetris => self.tetris.tick_ms,
            GameKind::Pong => self.pong.tick_ms,
            GameKind::Breakout => self.breakout.tick_ms,
            GameKind::SpaceInvaders => self.invaders.tick_ms,
            GameKind::Pacman => self.pacman.tick_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intervals() {
        let config = ArcadeConfig::default();
        assert_eq!(config.tick_interval(GameKind::Snake), Duration::from_millis(150));
        assert_eq!(config.tick_interval(GameKind::Tetris), Duration::from_millis(1000));
        assert_eq!(config.tick_interval(GameKind::Pong), Duration::from_millis(16));
        assert_eq!(config.tick_interval(GameKind::Pacman), Duration::from_millis(120));
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ArcadeConfig::default();
        for kind in GameKind::all() {
            assert!(config.validate(*kind).is_ok(), "{kind} defaults rejected");
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ArcadeConfig::from_json(r#"{ "seed": 7, "pong": { "max_score": 3 } }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pong.max_score, 3);
        assert_eq!(config.pong.width, 800.0);
        assert_eq!(config.snake, SnakeConfig::default());
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = ArcadeConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ArcadeConfig::from_path(Path::new("/nonexistent/hexcade.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_invalid_section_reported() {
        let config = ArcadeConfig::from_json(r#"{ "invaders": { "enemy_shoot_chance": 2.0 } }"#).unwrap();
        let err = config.validate(GameKind::SpaceInvaders).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { game: "space invaders", .. }));
        assert!(config.validate(GameKind::Snake).is_ok());
    }
}
