use async_trait::async_trait;

use crate::{error::NetworkError, logging::Logger};

/// Соединение с клиентом со стороны обработчика.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Отправляет данные клиенту. Если `without_encode` не выставлен,
    /// данные сначала проходят через кодек сервера.
    async fn send(
        &self,
        data: &[u8],
        without_encode: bool,
    ) -> Result<(), NetworkError>;

    fn remote(&self) -> String;

    fn local(&self) -> String;

    fn logger(&self) -> &Logger;
}
