use std::{fmt, sync::Arc, time::Duration};

use super::{Action, Codec};
use crate::logging::Logger;

/// Периодическая задача сервера: вызывается после запуска и возвращает
/// задержку до следующего вызова и действие для сервера.
pub type Task = Arc<dyn Fn() -> (Duration, Action) + Send + Sync>;

/// Изменение [`ServerOptions`].
pub type ServerOption = Box<dyn FnOnce(&mut ServerOptions) + Send>;

#[derive(Default, Clone)]
pub struct ServerOptions {
    pub logger: Option<Logger>,
    pub task: Option<Task>,
    /// Кодек для всех входящих и исходящих данных.
    pub codec: Option<Arc<dyn Codec>>,
}

impl ServerOptions {
    /// Применяет опции слева направо.
    pub fn from_opts<I>(opts: I) -> Self
    where
        I: IntoIterator<Item = ServerOption>,
    {
        let mut options = Self::default();
        for opt in opts {
            opt(&mut options);
        }
        options
    }
}

impl fmt::Debug for ServerOptions {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ServerOptions")
            .field("logger", &self.logger)
            .field("task", &self.task.is_some())
            .field("codec", &self.codec.is_some())
            .finish()
    }
}

pub fn with_logger(logger: Logger) -> ServerOption {
    Box::new(move |o| o.logger = Some(logger))
}

pub fn with_task<F>(task: F) -> ServerOption
where
    F: Fn() -> (Duration, Action) + Send + Sync + 'static,
{
    let task: Task = Arc::new(task);
    Box::new(move |o| o.task = Some(task))
}

pub fn with_codec<C>(codec: C) -> ServerOption
where
    C: Codec + 'static,
{
    let codec: Arc<dyn Codec> = Arc::new(codec);
    Box::new(move |o| o.codec = Some(codec))
}
