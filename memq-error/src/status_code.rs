use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки аргументов и опций
/// - 3xxx: Брокер (жизненный цикл, доставка)
/// - 4xxx: Буферы
/// - 5xxx: Конфигурация и логирование
/// - 6xxx: Сеть / IO
///
/// # Реализация:
/// - `num_enum::TryFromPrimitive` даёт нативную реализацию `TryFrom<u32>`.
/// - опционально: `strum` для `AsRefStr`/`EnumIter` (feature = "strum").
/// - опционально: `serde_repr` для сериализации в виде числового значения
///   (feature = "serde_repr").
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Unsupported = 1001,
    Unexpected = 1002,
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: Опции ===
    InvalidOption = 2000,
    InvalidTopic = 2001,
    InvalidTimeout = 2002,

    // === 3xxx: Брокер ===
    BrokerClosed = 3000,
    DeliveryDropped = 3001,

    // === 4xxx: Буферы ===
    CapacityNotEnough = 4000,

    // === 5xxx: Конфигурация ===
    InvalidConfig = 5000,
    LoggingInit = 5001,

    // === 6xxx: Сеть/IO ===
    Io = 6000,
    ConnectionClosed = 6001,
    Timeout = 6002,
    ServerClosed = 6003,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Имеет ли смысл повторить операцию с этим кодом.
    ///
    /// Закрытый брокер не «оживает», поэтому `BrokerClosed` не повторяется.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::CapacityNotEnough)
    }

    /// Внутренняя ошибка, подробности которой не показываются клиенту.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Unknown | Self::Unexpected | Self::Internal)
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::DeliveryDropped => LogLevel::Debug,
            Self::InvalidArgs
            | Self::InvalidOption
            | Self::InvalidTopic
            | Self::InvalidTimeout
            | Self::BrokerClosed => LogLevel::Info,
            Self::Timeout | Self::ConnectionClosed | Self::CapacityNotEnough => LogLevel::Warn,
            Self::Internal | Self::LoggingInit | Self::InvalidConfig => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет, что закрытие брокера не считается повторяемой ошибкой.
    #[test]
    fn test_retryable() {
        assert!(StatusCode::Timeout.is_retryable());
        assert!(StatusCode::CapacityNotEnough.is_retryable());
        assert!(!StatusCode::BrokerClosed.is_retryable());
        assert!(!StatusCode::InvalidTopic.is_retryable());
    }

    /// Тест проверяет конвертацию через `TryFrom<u32>`.
    #[test]
    fn test_try_from_u32() {
        let n = StatusCode::BrokerClosed.code();
        assert_eq!(StatusCode::try_from(n).unwrap(), StatusCode::BrokerClosed);
        assert!(StatusCode::try_from(99999).is_err());
    }

    #[test]
    fn test_code_and_into() {
        let c = StatusCode::BrokerClosed;
        assert_eq!(c.code(), 3000);
        let n: u32 = c.into();
        assert_eq!(n, 3000);
    }

    /// Тест проверяет отображаемый уровень логирования для разных кодов.
    #[test]
    fn test_log_level_mappings() {
        assert_eq!(StatusCode::Success.log_level(), LogLevel::Trace);
        assert_eq!(StatusCode::DeliveryDropped.log_level(), LogLevel::Debug);
        assert_eq!(StatusCode::BrokerClosed.log_level(), LogLevel::Info);
        assert_eq!(StatusCode::Internal.log_level(), LogLevel::Error);
        assert!(StatusCode::Unexpected.is_internal());
        assert!(!StatusCode::BrokerClosed.is_internal());
    }

    /// Тест проверяет формат `Display` — строка должна содержать имя варианта и
    /// числовой код.
    #[test]
    fn test_display_contains_name_and_code() {
        let s = format!("{}", StatusCode::BrokerClosed);
        assert!(s.contains("3000"), "Display must contain code 3000, got: {s}");
        assert!(
            s.contains("BrokerClosed"),
            "Display must contain variant name 'BrokerClosed', got: {s}"
        );
    }
}
