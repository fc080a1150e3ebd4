use async_trait::async_trait;
use tokio::sync::mpsc;

use super::Options;
use crate::error::BrokerResult;

/// Брокер сообщений публикация–подписка.
///
/// - `publish` рассылает значение всем подходящим подписчикам;
/// - `subscribe` регистрирует канал подписчика, опционально с фильтром по
///   теме и таймаутом доставки;
/// - `unsubscribe` снимает регистрацию (идемпотентно);
/// - `close` закрывает брокер (идемпотентно). Сообщения, уже стоящие в
///   очереди, будут разосланы до полной остановки.
///
/// После `close` все `publish`, `subscribe` и `unsubscribe` возвращают
/// [`BrokerError::Closed`](crate::error::BrokerError::Closed).
#[async_trait]
pub trait Broker<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Ставит значение в очередь. `Ok` означает только постановку в очередь,
    /// но не доставку.
    async fn publish(
        &self,
        value: T,
        options: Options,
    ) -> BrokerResult<()>;

    /// Регистрирует канал подписчика. После возврата любая следующая
    /// публикация того же вызывающего увидит эту подписку.
    async fn subscribe(
        &self,
        endpoint: mpsc::Sender<T>,
        options: Options,
    ) -> BrokerResult<()>;

    async fn unsubscribe(
        &self,
        endpoint: &mpsc::Sender<T>,
    ) -> BrokerResult<()>;

    /// Всегда возвращает `Ok`; повторные вызовы ничего не делают.
    fn close(&self) -> BrokerResult<()>;
}
