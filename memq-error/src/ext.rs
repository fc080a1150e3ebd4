use std::error::Error;

use crate::StatusCode;

/// Общее поведение ошибок memq: код статуса, текст для клиента, теги
/// метрик.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Код статуса; без переопределения считается внутренней ошибкой.
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Текст, который можно показать вызывающей стороне. Внутренние
    /// подробности скрываются.
    fn client_message(&self) -> String {
        if self.status_code().is_internal() {
            return "Internal error".to_string();
        }
        self.to_string()
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let code = self.status_code();
        vec![
            ("error_type", self.type_name()),
            ("status_code", code.to_string()),
            ("retryable", code.is_retryable().to_string()),
        ]
    }

    /// Короткое имя типа, без пути модулей.
    fn type_name(&self) -> String {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full).to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    #[derive(Debug)]
    struct DefaultError(pub &'static str);

    impl fmt::Display for DefaultError {
        fn fmt(
            &self,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            write!(f, "DefaultError: {}", self.0)
        }
    }

    impl Error for DefaultError {}

    impl ErrorExt for DefaultError {}

    #[derive(Debug)]
    struct ClosedError;

    impl fmt::Display for ClosedError {
        fn fmt(
            &self,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            write!(f, "broker is closed")
        }
    }

    impl Error for ClosedError {}

    impl ErrorExt for ClosedError {
        fn status_code(&self) -> StatusCode {
            StatusCode::BrokerClosed
        }
    }

    /// Тест проверяет, что по умолчанию статус ошибки — `Internal`, а
    /// сообщение для клиента не раскрывает детали.
    #[test]
    fn test_default_status_and_client_message() {
        let e = DefaultError("sensitive");
        assert_eq!(e.status_code(), StatusCode::Internal);
        assert_eq!(e.client_message(), "Internal error");
    }

    #[test]
    fn test_client_message_non_internal() {
        let e = ClosedError;
        assert_eq!(e.client_message(), "broker is closed");
    }

    /// Тест проверяет, что `metrics_tags` содержит `error_type`,
    /// `status_code` и признак повторяемости.
    #[test]
    fn test_metrics_tags_contains_expected_pairs() {
        let tags = ClosedError.metrics_tags();
        assert!(tags
            .iter()
            .any(|(k, v)| *k == "error_type" && v.ends_with("ClosedError")));
        assert!(tags
            .iter()
            .any(|(k, v)| *k == "status_code" && v == &StatusCode::BrokerClosed.to_string()));
        assert!(tags.contains(&("retryable", "false".to_string())));
    }
}
