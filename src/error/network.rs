use memq_error::{ErrorExt, StatusCode};
use thiserror::Error;

use super::BufferError;

#[derive(Debug, Error)]
pub enum NetworkError {
    /// Все адреса сервера остановлены.
    #[error("server closed")]
    ServerClosed,

    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),
}

impl ErrorExt for NetworkError {
    fn status_code(&self) -> StatusCode {
        match self {
            NetworkError::ServerClosed => StatusCode::ServerClosed,
            NetworkError::ConnectionClosed(_) => StatusCode::ConnectionClosed,
            NetworkError::Io(_) => StatusCode::Io,
            NetworkError::Buffer(e) => e.status_code(),
        }
    }
}
