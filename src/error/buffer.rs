use memq_error::{ErrorExt, StatusCode};
use thiserror::Error;

/// Ошибки кольцевого буфера.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Свободного места меньше, чем длина записи. Записано `written` байт.
    #[error("buffer capacity is not enough ({written} bytes written)")]
    CapacityNotEnough { written: usize },
}

impl BufferError {
    /// Сколько байт всё-таки попало в буфер.
    pub fn written(&self) -> usize {
        match self {
            BufferError::CapacityNotEnough { written } => *written,
        }
    }
}

impl ErrorExt for BufferError {
    fn status_code(&self) -> StatusCode {
        StatusCode::CapacityNotEnough
    }
}
