use parking_lot::Mutex;

use super::{Buffer, RingBuffer};

/// Сколько свободных буферов пул держит по умолчанию.
const DEFAULT_MAX_IDLE: usize = 64;

/// Пул кольцевых буферов одной ёмкости.
///
/// `get` отдаёт свободный буфер или создаёт новый, `put` очищает буфер и
/// возвращает его в пул. Лишние буферы сверх `max_idle` просто
/// уничтожаются.
pub struct BufferPool {
    buffer_capacity: usize,
    max_idle: usize,
    idle: Mutex<Vec<RingBuffer>>,
}

impl BufferPool {
    pub fn new(buffer_capacity: usize) -> Self {
        Self::with_max_idle(buffer_capacity, DEFAULT_MAX_IDLE)
    }

    pub fn with_max_idle(
        buffer_capacity: usize,
        max_idle: usize,
    ) -> Self {
        Self {
            buffer_capacity,
            max_idle,
            idle: Mutex::new(Vec::new()),
        }
    }

    pub fn get(&self) -> RingBuffer {
        self.idle
            .lock()
            .pop()
            .unwrap_or_else(|| RingBuffer::new(self.buffer_capacity))
    }

    pub fn put(
        &self,
        mut buf: RingBuffer,
    ) {
        buf.reset();
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(buf);
        }
    }

    /// Количество свободных буферов в пуле.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }
}
