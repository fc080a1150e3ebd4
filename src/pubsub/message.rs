use tokio::sync::{mpsc, oneshot};

use super::{Options, Subscriber};

/// Запрос на публикацию: значение и опции. После постановки в очередь не
/// меняется.
pub struct PublishItem<T> {
    pub value: T,
    pub options: Options,
    /// Подтверждение извлечения из очереди; используется при нулевой ёмкости,
    /// чтобы `publish` ждал, пока цикл заберёт значение.
    pub(crate) consumed: Option<oneshot::Sender<()>>,
}

/// Запрос на подписку. `done` закрывается после того, как реестр обновлён.
pub(crate) struct SubscribeRequest<T> {
    pub subscriber: Subscriber<T>,
    pub done: oneshot::Sender<()>,
}

/// Запрос на отписку.
pub(crate) struct UnsubscribeRequest<T> {
    pub endpoint: mpsc::Sender<T>,
    pub done: oneshot::Sender<()>,
}

impl<T> PublishItem<T> {
    pub fn new(
        value: T,
        options: Options,
    ) -> Self {
        Self {
            value,
            options,
            consumed: None,
        }
    }

    /// Топик сообщения, если он задан.
    pub fn topic(&self) -> Option<&str> {
        self.options.topic.as_deref()
    }

    pub(crate) fn with_ack(
        value: T,
        options: Options,
    ) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let item = Self {
            value,
            options,
            consumed: Some(tx),
        };
        (item, rx)
    }

    /// Сообщает ожидающему `publish`, что значение извлечено из очереди.
    pub(crate) fn ack(&mut self) {
        if let Some(tx) = self.consumed.take() {
            let _ = tx.send(());
        }
    }
}
