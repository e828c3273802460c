use std::path::PathBuf;

use thiserror::Error;

/// A single response line that could not be decoded.
///
/// Recoverable: the consumer reports it and keeps reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode stream line: {message}")]
pub struct DecodeError {
    /// The offending raw line.
    pub line: String,
    pub message: String,
}

/// Errors that abort the current turn. The session continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("network error: {0}")]
    Network(String),

    #[error("stream error: {0}")]
    Stream(String),
}

/// Errors from loading or decoding a persisted conversation.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed conversation data: {0}")]
    Malformed(String),

    #[error("failed to encode conversation: {0}")]
    Encode(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rejected session setting changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("temperature must be between 0.0 and 1.0, got {0}")]
    TemperatureOutOfRange(f64),

    #[error("max tokens must be greater than zero")]
    ZeroMaxTokens,
}
