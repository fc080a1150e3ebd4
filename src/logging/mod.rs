//! Логирование на `tracing`.
//!
//! [`init_logging`] устанавливает глобальный подписчик по
//! [`LoggingConfig`]: фильтр уровней, вывод в консоль и (опционально) в файл
//! с суточной ротацией. [`Logger`] — фасад с настраиваемым минимальным
//! уровнем для встраивающего приложения.

pub mod config;
mod filters;
mod formatter;
pub mod handle;
pub mod level;
pub mod logger;

pub use config::{FileConfig, LogFormat, LoggingConfig};
pub use handle::LoggingHandle;
pub use level::Level;
pub use logger::Logger;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::LoggingError;

/// Инициализация логирования с конфигурацией.
///
/// Возвращённый [`LoggingHandle`] нужно держать до завершения программы:
/// вместе с ним уничтожается фоновый writer файла.
pub fn init_logging(mut config: LoggingConfig) -> Result<LoggingHandle, LoggingError> {
    config.apply_env_overrides();
    config.validate()?;
    config.ensure_log_dir()?;

    let env_filter = filters::build_filter_from_config(&config);
    let mut layers = Vec::new();

    if config.console_enabled {
        layers.push(formatter::build_formatter(
            &config,
            config.format,
            config.with_ansi,
            std::io::stdout,
        ));
    }

    let file_guard = match &config.file {
        Some(file) => {
            let appender = rolling::daily(&file.dir, &file.filename);
            let (writer, guard) = non_blocking(appender);
            layers.push(formatter::build_formatter(
                &config,
                config.format,
                false,
                writer,
            ));
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = ?config.format,
        console_enabled = config.console_enabled,
        file_enabled = config.file.is_some(),
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}
