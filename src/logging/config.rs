use std::{env, fs, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Level;
use crate::error::LoggingError;

/// Формат вывода.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(LoggingError::InvalidFormat(other.to_string())),
        }
    }
}

/// Запись логов в файл (ротация раз в сутки).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub dir: PathBuf,
    pub filename: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            filename: "memq.log".to_string(),
        }
    }
}

/// Конфигурация логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    pub console_enabled: bool,
    pub with_ansi: bool,
    pub with_target: bool,
    /// Если задан, логи дублируются в файл.
    pub file: Option<FileConfig>,
    /// Дополнительные директивы `EnvFilter`, например `"memq::pubsub=trace"`.
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: LogFormat::Json,
            console_enabled: true,
            with_ansi: true,
            with_target: true,
            file: None,
            directives: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Переопределения из окружения: `MEMQ_LOG_LEVEL`, `MEMQ_LOG_FORMAT`,
    /// `MEMQ_LOG_DIR`. Некорректные значения игнорируются с предупреждением в
    /// stderr — подписчик `tracing` ещё не установлен.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("MEMQ_LOG_LEVEL") {
            match level.parse() {
                Ok(level) => self.level = level,
                Err(e) => eprintln!("Ignoring MEMQ_LOG_LEVEL: {e}"),
            }
        }
        if let Ok(format) = env::var("MEMQ_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("Ignoring MEMQ_LOG_FORMAT: {e}"),
            }
        }
        if let Ok(dir) = env::var("MEMQ_LOG_DIR") {
            self.file.get_or_insert_with(FileConfig::default).dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        if !self.console_enabled && self.file.is_none() {
            return Err(LoggingError::InvalidConfig(
                "at least one of console or file output must be enabled".into(),
            ));
        }
        if let Some(file) = &self.file {
            if file.filename.trim().is_empty() {
                return Err(LoggingError::InvalidConfig("log filename is empty".into()));
            }
        }
        Ok(())
    }

    pub fn ensure_log_dir(&self) -> Result<(), LoggingError> {
        if let Some(file) = &self.file {
            fs::create_dir_all(&file.dir)?;
        }
        Ok(())
    }

    /// Директива фильтра: базовый уровень и дополнительные директивы через
    /// запятую.
    pub fn build_filter_directive(&self) -> String {
        let mut parts = vec![self.level.as_directive().to_string()];
        parts.extend(self.directives.iter().cloned());
        parts.join(",")
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = LoggingConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.level, Level::Info);
    }

    #[test]
    fn test_validate_requires_output() {
        let cfg = LoggingConfig {
            console_enabled: false,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(LoggingError::InvalidConfig(_))
        ));

        let cfg = LoggingConfig {
            file: Some(FileConfig {
                dir: PathBuf::from("logs"),
                filename: "  ".into(),
            }),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_build_filter_directive() {
        let cfg = LoggingConfig {
            level: Level::Warn,
            directives: vec!["memq::pubsub=trace".into()],
            ..Default::default()
        };
        assert_eq!(cfg.build_filter_directive(), "warn,memq::pubsub=trace");
    }

    /// Тест проверяет переопределения из окружения.
    #[test]
    #[serial]
    fn test_env_overrides() {
        env::set_var("MEMQ_LOG_LEVEL", "debug");
        env::set_var("MEMQ_LOG_FORMAT", "compact");
        env::set_var("MEMQ_LOG_DIR", "/tmp/memq-logs");

        let mut cfg = LoggingConfig::default();
        cfg.apply_env_overrides();

        env::remove_var("MEMQ_LOG_LEVEL");
        env::remove_var("MEMQ_LOG_FORMAT");
        env::remove_var("MEMQ_LOG_DIR");

        assert_eq!(cfg.level, Level::Debug);
        assert_eq!(cfg.format, LogFormat::Compact);
        assert_eq!(
            cfg.file.map(|f| f.dir),
            Some(PathBuf::from("/tmp/memq-logs"))
        );
    }

    #[test]
    #[serial]
    fn test_env_override_invalid_level_ignored() {
        env::set_var("MEMQ_LOG_LEVEL", "loud");
        let mut cfg = LoggingConfig::default();
        cfg.apply_env_overrides();
        env::remove_var("MEMQ_LOG_LEVEL");
        assert_eq!(cfg.level, Level::Info);
    }

    #[test]
    fn test_ensure_log_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");
        let cfg = LoggingConfig {
            file: Some(FileConfig {
                dir: dir.clone(),
                filename: "memq.log".into(),
            }),
            ..Default::default()
        };
        cfg.ensure_log_dir().unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
