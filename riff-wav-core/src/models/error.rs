use thiserror::Error;

/// Errors raised by the byte stream, the RIFF-WAV reader and the writer.
///
/// Preparation and finalization collapse every lower-level cause into
/// [`WavError::NotRiffWav`]; streaming reads surface the remaining kinds
/// directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WavError {
    #[error("stream is not open")]
    IoUnavailable,

    #[error("short transfer: expected {expected} bytes, moved {actual}")]
    ShortTransfer { expected: usize, actual: usize },

    #[error("not a valid RIFF-WAV stream")]
    NotRiffWav,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("read error: {0}")]
    ReadError(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<std::io::Error> for WavError {
    fn from(e: std::io::Error) -> Self {
        WavError::StorageError(e.to_string())
    }
}
