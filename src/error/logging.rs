use memq_error::{ErrorExt, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    #[error("Invalid logging config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install global subscriber: {0}")]
    Init(String),
}

impl ErrorExt for LoggingError {
    fn status_code(&self) -> StatusCode {
        match self {
            LoggingError::InvalidLevel(_)
            | LoggingError::InvalidFormat(_)
            | LoggingError::InvalidConfig(_) => StatusCode::InvalidConfig,
            LoggingError::Io(_) => StatusCode::Io,
            LoggingError::Init(_) => StatusCode::LoggingInit,
        }
    }
}
