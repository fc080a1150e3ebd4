use memq_error::{ErrorExt, StatusCode};
use thiserror::Error;

/// Нарушение контракта при применении опций.
///
/// Возникает в момент сборки [`Options`](crate::pubsub::Options), а не внутри
/// цикла доставки.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("topic must be a string, got {0}")]
    NonStringTopic(String),

    #[error("timeout must be a non-negative integer of milliseconds, got {0}")]
    InvalidTimeout(String),
}

impl ErrorExt for OptionError {
    fn status_code(&self) -> StatusCode {
        match self {
            OptionError::NonStringTopic(_) => StatusCode::InvalidTopic,
            OptionError::InvalidTimeout(_) => StatusCode::InvalidTimeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_error_codes() {
        let e = OptionError::NonStringTopic("42".into());
        assert_eq!(e.status_code(), StatusCode::InvalidTopic);
        assert_eq!(e.to_string(), "topic must be a string, got 42");

        let e = OptionError::InvalidTimeout("\"soon\"".into());
        assert_eq!(e.status_code(), StatusCode::InvalidTimeout);
        assert!(!e.status_code().is_internal());
        assert_eq!(e.client_message(), e.to_string());
    }
}
