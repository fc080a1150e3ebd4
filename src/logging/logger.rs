use std::{fmt, sync::Arc};

use parking_lot::RwLock;

use super::Level;

/// Логгер с настраиваемым минимальным уровнем и набором полей.
///
/// Записи уходят в `tracing`; поля логгера пишутся одним полем `fields`.
/// Клоны и логгеры, полученные через [`Logger::with_field`], разделяют
/// минимальный уровень: `set_level` на любом из них действует на все.
#[derive(Clone)]
pub struct Logger {
    level: Arc<RwLock<Level>>,
    fields: Vec<(String, String)>,
}

macro_rules! emit {
    ($lvl:expr, $fields:expr, $msg:expr) => {{
        let fields = $fields;
        let msg = $msg;
        match ($lvl, fields.is_empty()) {
            (Level::Debug, true) => tracing::debug!("{}", msg),
            (Level::Debug, false) => tracing::debug!(fields = %fields, "{}", msg),
            (Level::Info, true) => tracing::info!("{}", msg),
            (Level::Info, false) => tracing::info!(fields = %fields, "{}", msg),
            (Level::Warn, true) => tracing::warn!("{}", msg),
            (Level::Warn, false) => tracing::warn!(fields = %fields, "{}", msg),
            (Level::Error, true) => tracing::error!("{}", msg),
            (Level::Error, false) => tracing::error!(fields = %fields, "{}", msg),
            (Level::Fatal, true) => tracing::error!(fatal = true, "{}", msg),
            (Level::Fatal, false) => tracing::error!(fatal = true, fields = %fields, "{}", msg),
        }
    }};
}

impl Logger {
    pub fn new(level: Level) -> Self {
        Self {
            level: Arc::new(RwLock::new(level)),
            fields: Vec::new(),
        }
    }

    /// Новый логгер с дополнительным полем. Исходный не меняется.
    pub fn with_field(
        &self,
        name: impl Into<String>,
        value: impl fmt::Display,
    ) -> Logger {
        let mut fields = self.fields.clone();
        fields.push((name.into(), value.to_string()));
        Logger {
            level: Arc::clone(&self.level),
            fields,
        }
    }

    pub fn level(&self) -> Level {
        *self.level.read()
    }

    pub fn set_level(
        &self,
        level: Level,
    ) {
        *self.level.write() = level;
    }

    pub fn enabled(
        &self,
        level: Level,
    ) -> bool {
        level >= self.level()
    }

    pub fn debug(
        &self,
        msg: impl fmt::Display,
    ) {
        self.log(Level::Debug, msg);
    }

    pub fn info(
        &self,
        msg: impl fmt::Display,
    ) {
        self.log(Level::Info, msg);
    }

    pub fn warn(
        &self,
        msg: impl fmt::Display,
    ) {
        self.log(Level::Warn, msg);
    }

    pub fn error(
        &self,
        msg: impl fmt::Display,
    ) {
        self.log(Level::Error, msg);
    }

    /// Пишет запись уровня ошибки с `fatal = true`. Процесс не
    /// завершается: это решает вызывающий код.
    pub fn fatal(
        &self,
        msg: impl fmt::Display,
    ) {
        self.log(Level::Fatal, msg);
    }

    pub fn log(
        &self,
        level: Level,
        msg: impl fmt::Display,
    ) {
        if !self.enabled(level) {
            return;
        }
        emit!(level, self.render_fields(), msg);
    }

    fn render_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl fmt::Debug for Logger {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("fields", &self.fields)
            .finish()
    }
}
