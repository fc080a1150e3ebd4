use memq_error::{ErrorExt, StatusCode};
use thiserror::Error;

pub type BrokerResult<T> = Result<T, BrokerError>;

/// Ошибка операций брокера.
///
/// После `close` (явного, через токен отмены или через `Drop`) любой вызов
/// `publish`, `subscribe` и `unsubscribe` получает `Closed`. Сам `close`
/// никогда не возвращает ошибку.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BrokerError {
    #[error("broker is closed")]
    Closed,
}

impl ErrorExt for BrokerError {
    fn status_code(&self) -> StatusCode {
        match self {
            BrokerError::Closed => StatusCode::BrokerClosed,
        }
    }
}
