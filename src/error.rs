use std::time::Duration;

/// Result type for subtitle operations
pub type Result<T> = std::result::Result<T, SubtitleError>;

/// Error types for subtitle generation
#[derive(thiserror::Error, Debug)]
pub enum SubtitleError {
    #[error("Malformed word #{index} {word:?}: end {end:?} is before start {start:?}")]
    MalformedWord {
        index: usize,
        word: String,
        start: Duration,
        end: Duration,
    },

    #[error("Invalid time offset: {0}")]
    InvalidOffset(String),

    #[error("Invalid SRT at line {line}: {reason}")]
    InvalidSrt { line: usize, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Segmentation task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
