use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use super::Options;

/// Запись реестра: канал подписчика и опции, с которыми он подписался.
pub struct Subscriber<T> {
    endpoint: mpsc::Sender<T>,
    options: Options,
}

/// Итог одной попытки доставки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Истёк таймаут подписчика, сообщение для него потеряно.
    TimedOut,
    /// Брокер закрывается, а в канале подписчика нет места.
    Cancelled,
    /// Получатель подписчика уничтожен.
    Closed,
}

impl<T> Subscriber<T> {
    pub fn new(
        endpoint: mpsc::Sender<T>,
        options: Options,
    ) -> Self {
        Self { endpoint, options }
    }

    pub fn endpoint(&self) -> &mpsc::Sender<T> {
        &self.endpoint
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Тот же ли это канал (идентичность, а не равенство значений).
    pub fn is_endpoint(
        &self,
        endpoint: &mpsc::Sender<T>,
    ) -> bool {
        self.endpoint.same_channel(endpoint)
    }

    /// Таймаут подписчика, а при его отсутствии — общий таймаут брокера.
    pub fn delivery_timeout(
        &self,
        default: Option<Duration>,
    ) -> Option<Duration> {
        self.options.timeout.or(default)
    }

    /// Передаёт значение в канал подписчика.
    ///
    /// Если в канале есть место, доставка происходит сразу, даже когда брокер
    /// уже закрывается. Иначе ожидание ограничено таймаутом (если он есть) и
    /// отменой `shutdown`. Без таймаута ожидание длится до тех пор, пока
    /// подписчик не освободит место или брокер не будет закрыт.
    pub async fn deliver(
        &self,
        value: T,
        timeout: Option<Duration>,
        shutdown: &CancellationToken,
    ) -> Delivery {
        let value = match self.endpoint.try_send(value) {
            Ok(()) => return Delivery::Delivered,
            Err(TrySendError::Closed(_)) => return Delivery::Closed,
            Err(TrySendError::Full(value)) => value,
        };

        let send = self.endpoint.send(value);
        match timeout {
            Some(limit) => tokio::select! {
                biased;
                res = tokio::time::timeout(limit, send) => match res {
                    Ok(Ok(())) => Delivery::Delivered,
                    Ok(Err(_)) => Delivery::Closed,
                    Err(_) => Delivery::TimedOut,
                },
                _ = shutdown.cancelled() => Delivery::Cancelled,
            },
            None => tokio::select! {
                biased;
                res = send => match res {
                    Ok(()) => Delivery::Delivered,
                    Err(_) => Delivery::Closed,
                },
                _ = shutdown.cancelled() => Delivery::Cancelled,
            },
        }
    }
}

/// Реестр подписчиков. Принадлежит только циклу диспетчеризации, поэтому
/// блокировок не требует.
///
/// Ключ — идентичность канала. `mpsc::Sender` не реализует `Hash`, так что
/// поиск линейный через `same_channel`.
pub(crate) struct Registry<T> {
    entries: Vec<Subscriber<T>>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Добавляет подписчика или заменяет опции уже подписанного канала.
    pub fn upsert(
        &mut self,
        subscriber: Subscriber<T>,
    ) {
        match self
            .entries
            .iter_mut()
            .find(|s| s.is_endpoint(&subscriber.endpoint))
        {
            Some(existing) => existing.options = subscriber.options,
            None => self.entries.push(subscriber),
        }
    }

    /// Удаляет канал, если он зарегистрирован. Возвращает `true`, если запись
    /// была.
    pub fn remove(
        &mut self,
        endpoint: &mpsc::Sender<T>,
    ) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| !s.is_endpoint(endpoint));
        before != self.entries.len()
    }

    /// Удаляет подписчиков, чьи получатели уничтожены. Возвращает их число.
    pub fn prune_closed(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|s| !s.endpoint.is_closed());
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscriber<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
