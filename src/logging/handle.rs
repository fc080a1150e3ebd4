use tracing_appender::non_blocking::WorkerGuard;

/// Управляет временем жизни логирования. Пока дескриптор жив, фоновый
/// writer файла продолжает сбрасывать записи.
pub struct LoggingHandle {
    file_guard: Option<WorkerGuard>,
}

impl LoggingHandle {
    pub fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self { file_guard }
    }

    /// Пишет ли логирование в файл.
    pub fn has_file_output(&self) -> bool {
        self.file_guard.is_some()
    }

    /// Сбрасывает буферы файлового writer'а и завершает его.
    pub fn shutdown(mut self) {
        tracing::info!("Logging shutdown");
        drop(self.file_guard.take());
    }
}
