use std::path::PathBuf;

use crate::session::GameKind;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid {game} setting: {reason}")]
    Invalid { game: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(game: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            game,
            reason: reason.into(),
        }
    }
}

/// Session errors surfaced to the host
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{kind} is unavailable: {source}")]
    EngineUnavailable {
        kind: GameKind,
        #[source]
        source: ConfigError,
    },

    #[error("No game selected")]
    NoGameSelected,
}
