use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{
    dispatch::{CloseReason, DispatchLoop, Shared},
    message::{SubscribeRequest, UnsubscribeRequest},
    Broker, Options, PublishItem, Subscriber,
};
use crate::error::{BrokerError, BrokerResult};

/// Настройки брокера в памяти.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Ёмкость очереди публикаций. `0` — синхронная передача: `publish`
    /// ждёт, пока цикл заберёт значение.
    pub capacity: usize,
    /// Общий таймаут доставки для подписчиков без собственного таймаута.
    ///
    /// По умолчанию не задан: подписчик без таймаута с заполненным каналом
    /// останавливает весь цикл рассылки до освобождения места или закрытия
    /// брокера.
    pub default_timeout: Option<Duration>,
}

impl BrokerConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            default_timeout: None,
        }
    }

    pub fn with_default_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.default_timeout = Some(timeout);
        self
    }
}

/// Брокер, работающий внутри процесса на каналах `tokio`.
///
/// Реестром подписчиков владеет одна фоновая задача (цикл диспетчеризации);
/// методы фасада только передают ей запросы. Дескриптор дешёво клонируется.
///
/// Владелец обязан вызвать [`Broker::close`]. Уничтожение последнего
/// клона закрывает брокер так же, как `close`.
///
/// ```no_run
/// use memq::{Broker, MemoryBroker, Options};
/// use tokio::sync::mpsc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), memq::BrokerError> {
/// let broker = MemoryBroker::new(CancellationToken::new(), 16);
/// let (tx, mut rx) = mpsc::channel(8);
/// broker.subscribe(tx, Options::new().topic("news")).await?;
/// broker.publish("hello", Options::new().topic("news")).await?;
/// assert_eq!(rx.recv().await, Some("hello"));
/// broker.close()?;
/// # Ok(())
/// # }
/// ```
pub struct MemoryBroker<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    shared: Arc<Shared>,
    publish_tx: mpsc::Sender<PublishItem<T>>,
    subscribe_tx: mpsc::Sender<SubscribeRequest<T>>,
    unsubscribe_tx: mpsc::Sender<UnsubscribeRequest<T>>,
    synchronous: bool,
}

impl<T> MemoryBroker<T>
where
    T: Clone + Send + 'static,
{
    /// Создаёт брокер, привязанный к внешнему токену отмены, и запускает
    /// цикл диспетчеризации. Должен вызываться внутри runtime `tokio`.
    pub fn new(
        cancel: CancellationToken,
        capacity: usize,
    ) -> Self {
        Self::with_config(cancel, BrokerConfig::new(capacity))
    }

    pub fn with_config(
        cancel: CancellationToken,
        config: BrokerConfig,
    ) -> Self {
        let shared = Arc::new(Shared::new(&cancel));

        // mpsc не допускает нулевую ёмкость: синхронность обеспечивается
        // подтверждением извлечения.
        let (publish_tx, publish_rx) = mpsc::channel(config.capacity.max(1));
        let (subscribe_tx, subscribe_rx) = mpsc::channel(1);
        let (unsubscribe_tx, unsubscribe_rx) = mpsc::channel(1);

        let dispatch = DispatchLoop::new(
            publish_rx,
            subscribe_rx,
            unsubscribe_rx,
            shared.clone(),
            config.default_timeout,
        );
        tokio::spawn(dispatch.run());
        debug!(capacity = config.capacity, "memory broker created");

        Self {
            inner: Arc::new(Inner {
                shared,
                publish_tx,
                subscribe_tx,
                unsubscribe_tx,
                synchronous: config.capacity == 0,
            }),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shared.is_closed()
    }

    /// Ждёт, пока цикл диспетчеризации сольёт очередь и завершится.
    pub async fn wait_terminated(&self) {
        self.inner.shared.terminated.cancelled().await
    }

    fn ensure_open(&self) -> BrokerResult<()> {
        if self.inner.shared.is_closed() {
            return Err(BrokerError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl<T> Broker<T> for MemoryBroker<T>
where
    T: Clone + Send + 'static,
{
    async fn publish(
        &self,
        value: T,
        options: Options,
    ) -> BrokerResult<()> {
        self.ensure_open()?;

        if self.inner.synchronous {
            let (item, consumed) = PublishItem::with_ack(value, options);
            self.inner
                .publish_tx
                .send(item)
                .await
                .map_err(|_| BrokerError::Closed)?;
            // Значение уже в очереди; ошибка ожидания означает лишь, что цикл
            // завершился, а слив очереди это уже учёл.
            let _ = consumed.await;
            return Ok(());
        }

        self.inner
            .publish_tx
            .send(PublishItem::new(value, options))
            .await
            .map_err(|_| BrokerError::Closed)
    }

    async fn subscribe(
        &self,
        endpoint: mpsc::Sender<T>,
        options: Options,
    ) -> BrokerResult<()> {
        self.ensure_open()?;
        let (done, accepted) = oneshot::channel();
        let req = SubscribeRequest {
            subscriber: Subscriber::new(endpoint, options),
            done,
        };
        self.inner
            .subscribe_tx
            .send(req)
            .await
            .map_err(|_| BrokerError::Closed)?;
        accepted.await.map_err(|_| BrokerError::Closed)
    }

    async fn unsubscribe(
        &self,
        endpoint: &mpsc::Sender<T>,
    ) -> BrokerResult<()> {
        self.ensure_open()?;
        let (done, accepted) = oneshot::channel();
        let req = UnsubscribeRequest {
            endpoint: endpoint.clone(),
            done,
        };
        self.inner
            .unsubscribe_tx
            .send(req)
            .await
            .map_err(|_| BrokerError::Closed)?;
        accepted.await.map_err(|_| BrokerError::Closed)
    }

    fn close(&self) -> BrokerResult<()> {
        self.inner.shared.close(CloseReason::Explicit);
        Ok(())
    }
}

impl<T> Clone for MemoryBroker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        self.shared.close(CloseReason::Dropped);
    }
}
