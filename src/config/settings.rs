use std::{path::Path, time::Duration};

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{
    logging::{Level, LogFormat, LoggingConfig},
    pubsub::BrokerConfig,
};

/// Ёмкость очереди публикаций по умолчанию.
pub const DEFAULT_CAPACITY: usize = 64;

/// Настройки приложения: значения по умолчанию, затем необязательный файл,
/// затем переменные окружения с префиксом `MEMQ_` (`MEMQ_CAPACITY`,
/// `MEMQ_DEFAULT_TIMEOUT_MS`, `MEMQ_LOG_LEVEL`, `MEMQ_LOG_FORMAT`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub capacity: usize,
    pub default_timeout_ms: Option<u64>,
    pub log_level: Level,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(Environment::with_prefix("MEMQ"))
            .build()?
            .try_deserialize()
    }

    /// Как [`Settings::load`], но с файлом конфигурации (формат по
    /// расширению). Окружение важнее файла.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("MEMQ"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("capacity", DEFAULT_CAPACITY as u64)?
            .set_default("log_level", "info")?
            .set_default("log_format", "json")
    }

    pub fn broker_config(&self) -> BrokerConfig {
        let config = BrokerConfig::new(self.capacity);
        match self.default_timeout_ms {
            Some(ms) => config.with_default_timeout(Duration::from_millis(ms)),
            None => config,
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level,
            format: self.log_format,
            ..Default::default()
        }
    }
}
