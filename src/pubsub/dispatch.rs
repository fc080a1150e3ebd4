use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use memq_error::{LogLevel, StatusCode};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::{
    message::{SubscribeRequest, UnsubscribeRequest},
    Delivery, PublishItem, Registry,
};

/// Событие `tracing` с уровнем, который задаёт код статуса.
macro_rules! status_event {
    ($code:expr, $($arg:tt)+) => {{
        let code: StatusCode = $code;
        match code.log_level() {
            LogLevel::Trace => trace!(code = %code, $($arg)+),
            LogLevel::Debug => debug!(code = %code, $($arg)+),
            LogLevel::Info => info!(code = %code, $($arg)+),
            LogLevel::Warn => warn!(code = %code, $($arg)+),
            LogLevel::Error => error!(code = %code, $($arg)+),
        }
    }};
}

/// Причина перехода брокера в закрытое состояние.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Вызван `close`.
    Explicit,
    /// Отменён внешний токен, к которому привязан брокер.
    Cancelled,
    /// Уничтожен последний дескриптор брокера.
    Dropped,
}

/// Состояние, разделяемое фасадом и циклом.
///
/// Флаг `closed` — единственное изменяемое состояние, которое читается вне
/// цикла. Ровно один вызов `close` выигрывает CAS и отменяет `shutdown`.
pub(crate) struct Shared {
    closed: AtomicBool,
    /// Дочерний токен внешней отмены. Отменяется при закрытии брокера.
    pub(crate) shutdown: CancellationToken,
    /// Отменяется, когда цикл завершил слив очереди и вышел.
    pub(crate) terminated: CancellationToken,
}

impl Shared {
    pub(crate) fn new(parent: &CancellationToken) -> Self {
        Self {
            closed: AtomicBool::new(false),
            shutdown: parent.child_token(),
            terminated: CancellationToken::new(),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Переводит брокер в закрытое состояние. Возвращает `true` только для
    /// вызова, который выполнил переход.
    pub(crate) fn close(
        &self,
        reason: CloseReason,
    ) -> bool {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        info!(reason = ?reason, "broker closing");
        self.shutdown.cancel();
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopState {
    Running,
    Draining,
    Terminated,
}

/// Цикл диспетчеризации: единственный владелец реестра подписчиков.
///
/// Подписка, отписка и рассылка одной публикации обрабатываются целиком и
/// между собой не перемежаются. Доставка подписчику без таймаута может
/// остановить весь цикл, пока подписчик не освободит место или брокер не
/// будет закрыт.
pub(crate) struct DispatchLoop<T> {
    registry: Registry<T>,
    publish_rx: mpsc::Receiver<PublishItem<T>>,
    subscribe_rx: mpsc::Receiver<SubscribeRequest<T>>,
    unsubscribe_rx: mpsc::Receiver<UnsubscribeRequest<T>>,
    shared: Arc<Shared>,
    default_timeout: Option<Duration>,
    state: LoopState,
}

impl<T> DispatchLoop<T>
where
    T: Clone + Send + 'static,
{
    pub(crate) fn new(
        publish_rx: mpsc::Receiver<PublishItem<T>>,
        subscribe_rx: mpsc::Receiver<SubscribeRequest<T>>,
        unsubscribe_rx: mpsc::Receiver<UnsubscribeRequest<T>>,
        shared: Arc<Shared>,
        default_timeout: Option<Duration>,
    ) -> Self {
        Self {
            registry: Registry::new(),
            publish_rx,
            subscribe_rx,
            unsubscribe_rx,
            shared,
            default_timeout,
            state: LoopState::Running,
        }
    }

    pub(crate) async fn run(mut self) {
        debug!(default_timeout = ?self.default_timeout, "dispatch loop started");

        while self.state == LoopState::Running {
            tokio::select! {
                _ = self.shared.shutdown.cancelled() => {
                    // Внешняя отмена приходит сюда, минуя `close`.
                    self.shared.close(CloseReason::Cancelled);
                    self.begin_drain();
                }
                Some(req) = self.subscribe_rx.recv() => self.handle_subscribe(req),
                Some(req) = self.unsubscribe_rx.recv() => self.handle_unsubscribe(req),
                item = self.publish_rx.recv() => match item {
                    Some(item) => self.dispatch(item).await,
                    None => {
                        self.shared.close(CloseReason::Dropped);
                        self.begin_drain();
                    }
                },
            }
        }

        let mut drained = 0usize;
        while let Some(item) = self.publish_rx.recv().await {
            self.dispatch(item).await;
            drained += 1;
        }

        self.state = LoopState::Terminated;
        self.shared.terminated.cancel();
        info!(
            drained,
            subscribers = self.registry.len(),
            "dispatch loop terminated"
        );
    }

    /// Закрывает все входы цикла. Уже стоящие в очереди публикации остаются
    /// доступны для слива, новые не принимаются.
    fn begin_drain(&mut self) {
        self.state = LoopState::Draining;
        self.publish_rx.close();
        self.subscribe_rx.close();
        self.unsubscribe_rx.close();
        debug!("dispatch loop draining");
    }

    fn handle_subscribe(
        &mut self,
        req: SubscribeRequest<T>,
    ) {
        self.registry.upsert(req.subscriber);
        trace!(subscribers = self.registry.len(), "subscriber registered");
        let _ = req.done.send(());
    }

    fn handle_unsubscribe(
        &mut self,
        req: UnsubscribeRequest<T>,
    ) {
        if self.registry.remove(&req.endpoint) {
            trace!(subscribers = self.registry.len(), "subscriber removed");
        }
        let _ = req.done.send(());
    }

    /// Рассылает одну публикацию всем подходящим подписчикам.
    async fn dispatch(
        &mut self,
        mut item: PublishItem<T>,
    ) {
        item.ack();

        let mut closed = 0usize;
        for sub in self.registry.iter() {
            if !sub.options().accepts(&item.options) {
                continue;
            }
            let timeout = sub.delivery_timeout(self.default_timeout);
            match sub
                .deliver(item.value.clone(), timeout, &self.shared.shutdown)
                .await
            {
                Delivery::Delivered => {}
                Delivery::TimedOut => {
                    status_event!(
                        StatusCode::DeliveryDropped,
                        topic = ?item.topic(),
                        timeout = ?timeout,
                        "delivery timed out, message dropped"
                    );
                }
                Delivery::Cancelled => {
                    status_event!(
                        StatusCode::DeliveryDropped,
                        topic = ?item.topic(),
                        "delivery abandoned on shutdown, message dropped"
                    );
                }
                Delivery::Closed => closed += 1,
            }
        }

        if closed > 0 {
            let pruned = self.registry.prune_closed();
            warn!(pruned, "subscriber receivers dropped, removed from registry");
        }
    }
}
