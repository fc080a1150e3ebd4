use async_trait::async_trait;
use bytes::Bytes;

use super::{Action, Connection};
use crate::error::NetworkError;

/// Обработчик событий соединения. Возвращаемый [`Action`] управляет
/// соединением или всем сервером.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn on_connected(
        &self,
        conn: &dyn Connection,
    ) -> Result<Action, NetworkError>;

    async fn on_disconnected(
        &self,
        conn: &dyn Connection,
    ) -> Result<(), NetworkError>;

    /// Вызывается на каждый кадр. Если кодек не задан, кадр — сырые
    /// прочитанные данные.
    async fn on_received(
        &self,
        frame: Bytes,
        conn: &dyn Connection,
    ) -> Result<Action, NetworkError>;

    async fn on_error(
        &self,
        conn: &dyn Connection,
        err: &NetworkError,
    ) -> Action;
}
