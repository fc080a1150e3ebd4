use std::{collections::HashMap, time::Duration};

use serde_json::Value;

use crate::error::OptionError;

/// Ключ опции темы в расширенном (строковом) представлении.
pub const TOPIC_OPTION_KEY: &str = "topic";
/// Ключ опции таймаута доставки; значение в миллисекундах.
pub const TIMEOUT_OPTION_KEY: &str = "timeout";

/// Опции публикации или подписки.
///
/// Две распознаваемые брокером опции вынесены в именованные поля:
/// - `topic`: у подписки фильтр по теме (без темы приходят все сообщения), у
///   публикации тег сообщения (без темы сообщение не попадает подписчикам с
///   фильтром);
/// - `timeout`: ограничение времени доставки одному подписчику.
///
/// Всё остальное сохраняется в `extensions` и брокером не интерпретируется.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub topic: Option<String>,
    pub timeout: Option<Duration>,
    pub extensions: HashMap<String, Value>,
}

/// Одна опция-мутатор. Применяются слева направо: более поздняя перезаписывает
/// более раннюю с тем же ключом.
#[derive(Debug, Clone, PartialEq)]
pub enum BrokerOption {
    Topic(String),
    Timeout(Duration),
    Extension(String, Value),
}

/// Тема публикации или фильтр подписки.
pub fn with_topic(topic: impl Into<String>) -> BrokerOption {
    BrokerOption::Topic(topic.into())
}

/// Таймаут доставки подписчику.
pub fn with_timeout(timeout: Duration) -> BrokerOption {
    BrokerOption::Timeout(timeout)
}

/// Произвольный ключ. Ключи `topic` и `timeout` проверяются на тип при
/// применении.
pub fn with_extension(
    key: impl Into<String>,
    value: impl Into<Value>,
) -> BrokerOption {
    BrokerOption::Extension(key.into(), value.into())
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Собирает опции из списка, применяя их по порядку.
    pub fn from_opts<I>(opts: I) -> Result<Self, OptionError>
    where
        I: IntoIterator<Item = BrokerOption>,
    {
        let mut options = Self::default();
        for opt in opts {
            options.apply(opt)?;
        }
        Ok(options)
    }

    pub fn topic(
        mut self,
        topic: impl Into<String>,
    ) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Применяет одну опцию.
    ///
    /// Расширение с ключом `topic` обязано быть строкой, с ключом `timeout` —
    /// целым числом миллисекунд. Иначе это ошибка вызывающего кода, а не
    /// повод для приведения типов.
    pub fn apply(
        &mut self,
        opt: BrokerOption,
    ) -> Result<(), OptionError> {
        match opt {
            BrokerOption::Topic(topic) => self.topic = Some(topic),
            BrokerOption::Timeout(timeout) => self.timeout = Some(timeout),
            BrokerOption::Extension(key, value) => match key.as_str() {
                TOPIC_OPTION_KEY => match value {
                    Value::String(topic) => self.topic = Some(topic),
                    other => return Err(OptionError::NonStringTopic(other.to_string())),
                },
                TIMEOUT_OPTION_KEY => match value.as_u64() {
                    Some(ms) => self.timeout = Some(Duration::from_millis(ms)),
                    None => return Err(OptionError::InvalidTimeout(value.to_string())),
                },
                _ => {
                    self.extensions.insert(key, value);
                }
            },
        }
        Ok(())
    }

    pub fn extension(
        &self,
        key: &str,
    ) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Проверяет, должна ли подписка с этими опциями получить публикацию с
    /// опциями `published`. Сравнение тем — точное совпадение строк.
    pub fn accepts(
        &self,
        published: &Options,
    ) -> bool {
        match (&self.topic, &published.topic) {
            (None, _) => true,
            (Some(filter), Some(topic)) => filter == topic,
            (Some(_), None) => false,
        }
    }
}

impl From<BrokerOption> for Options {
    fn from(opt: BrokerOption) -> Self {
        let mut options = Self::default();
        // Topic и Timeout применяются без ошибок; для расширений с
        // зарезервированным ключом нужен `Options::from_opts`.
        if let Err(err) = options.apply(opt) {
            tracing::warn!(error = %err, "option ignored");
        }
        options
    }
}

impl FromIterator<BrokerOption> for Options {
    /// Как `from_opts`, но опции с ошибкой пропускаются с предупреждением.
    fn from_iter<I: IntoIterator<Item = BrokerOption>>(iter: I) -> Self {
        let mut options = Self::default();
        for opt in iter {
            if let Err(err) = options.apply(opt) {
                tracing::warn!(error = %err, "option ignored");
            }
        }
        options
    }
}
