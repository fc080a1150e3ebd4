use std::borrow::Cow;

use bytes::Bytes;

use super::Buffer;
use crate::error::BufferError;

/// Ёмкость буфера по умолчанию.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// Кольцевой буфер фиксированной ёмкости.
///
/// `start` — позиция чтения, `end` — позиция записи. При `start == end`
/// буфер либо пуст, либо полон; различает их флаг `full`.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    start: usize,
    end: usize,
    full: bool,
    buf: Box<[u8]>,
}

impl RingBuffer {
    /// Создаёт буфер заданной ёмкости. Нулевая ёмкость заменяется на
    /// [`DEFAULT_BUFFER_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_BUFFER_CAPACITY
        } else {
            capacity
        };
        Self {
            start: 0,
            end: 0,
            full: false,
            buf: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Свободное место.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.size()
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

impl Buffer for RingBuffer {
    fn next_n(
        &self,
        n: usize,
    ) -> (usize, Cow<'_, [u8]>) {
        let size = self.size();
        if n == 0 || size == 0 {
            return (0, Cow::Borrowed(&[]));
        }
        let n = n.min(size);
        let cap = self.capacity();

        if self.start + n <= cap {
            return (n, Cow::Borrowed(&self.buf[self.start..self.start + n]));
        }

        let head = &self.buf[self.start..];
        let mut out = Vec::with_capacity(n);
        out.extend_from_slice(head);
        out.extend_from_slice(&self.buf[..n - head.len()]);
        (n, Cow::Owned(out))
    }

    fn shift_n(
        &mut self,
        n: usize,
    ) -> usize {
        if n == 0 {
            return 0;
        }
        let n = n.min(self.size());
        self.start = (self.start + n) % self.capacity();
        if n > 0 {
            self.full = false;
        }
        n
    }

    fn read_n(
        &mut self,
        n: usize,
    ) -> (usize, Bytes) {
        let (n, data) = self.next_n(n);
        let data = Bytes::copy_from_slice(&data);
        self.shift_n(n);
        (n, data)
    }

    fn size(&self) -> usize {
        let cap = self.capacity();
        match self.start.cmp(&self.end) {
            std::cmp::Ordering::Equal if self.full => cap,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Less => self.end - self.start,
            std::cmp::Ordering::Greater => cap - self.start + self.end,
        }
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn write(
        &mut self,
        p: &[u8],
    ) -> Result<usize, BufferError> {
        let free = self.remaining();
        let truncated = free < p.len();
        let n = p.len().min(free);

        if n > 0 {
            let cap = self.capacity();
            let tail = cap - self.end;
            if self.start <= self.end && tail < n {
                self.buf[self.end..].copy_from_slice(&p[..tail]);
                self.buf[..n - tail].copy_from_slice(&p[tail..n]);
            } else {
                self.buf[self.end..self.end + n].copy_from_slice(&p[..n]);
            }
            self.end = (self.end + n) % cap;
            if n == free {
                self.full = true;
            }
        }

        if truncated {
            return Err(BufferError::CapacityNotEnough { written: n });
        }
        Ok(n)
    }

    fn reset(&mut self) {
        self.start = 0;
        self.end = 0;
        self.full = false;
    }

    fn bytes(&self) -> Bytes {
        let (_, data) = self.next_n(self.size());
        Bytes::copy_from_slice(&data)
    }
}
