//! Error types. Placement rejections leave the round untouched.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("tray slot {slot} does not exist")]
    SlotOutOfRange { slot: usize },
    #[error("tray slot {slot} is empty")]
    EmptyTraySlot { slot: usize },
    #[error("piece does not fit at anchor ({anchor_row}, {anchor_col})")]
    InvalidPlacement { anchor_row: i32, anchor_col: i32 },
    #[error("round is over")]
    RoundOver,
    #[error("round has not been won")]
    RoundNotWon,
    #[error("dictionary has no words")]
    NoEligibleWord,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("counter {key} holds a non-integer value {value:?}")]
    Corrupt { key: String, value: String },
}

/// Failures surfaced by a multi-round session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
