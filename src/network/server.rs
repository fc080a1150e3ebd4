use std::{fmt, net::SocketAddr, sync::Arc};

use async_trait::async_trait;

use super::Handler;
use crate::error::NetworkError;

/// Что сделать после вызова обработчика.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Nothing,
    /// Закрыть соединение.
    Disconnect,
    /// Остановить сервер.
    StopServer,
}

/// Адрес, на котором сервер принимает соединения.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pub addr: SocketAddr,
}

impl Address {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }
}

impl From<SocketAddr> for Address {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.addr)
    }
}

/// Сервер с несколькими адресами, у каждого свой обработчик.
#[async_trait]
pub trait Server: Send + Sync {
    /// Привязывает обработчик к адресу.
    fn bind(
        &self,
        address: Address,
        handler: Arc<dyn Handler>,
    ) -> Result<(), NetworkError>;

    /// Останавливает перечисленные адреса; пустой список останавливает все.
    fn stop(
        &self,
        addresses: &[Address],
    ) -> Result<(), NetworkError>;

    /// Запускает сервер и ждёт. Когда остановлены все адреса, возвращает
    /// [`NetworkError::ServerClosed`].
    async fn start(&self) -> Result<(), NetworkError>;
}
