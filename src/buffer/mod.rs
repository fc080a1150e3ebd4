//! Байтовый кольцевой буфер и пул буферов для сетевого ввода-вывода.
//!
//! - `ring`: [`RingBuffer`] фиксированной ёмкости;
//! - `pool`: [`BufferPool`] для повторного использования буферов.

pub mod pool;
pub mod ring;

use std::borrow::Cow;

use bytes::Bytes;

pub use pool::BufferPool;
pub use ring::{RingBuffer, DEFAULT_BUFFER_CAPACITY};

use crate::error::BufferError;

/// Байтовый буфер с курсором чтения.
pub trait Buffer: Send {
    /// Возвращает до `n` следующих байт, не сдвигая курсор.
    ///
    /// Если данные не пересекают границу кольца, это заимствование без
    /// копирования.
    fn next_n(
        &self,
        n: usize,
    ) -> (usize, Cow<'_, [u8]>);

    /// Сдвигает курсор чтения на `n` байт (не больше размера). Возвращает
    /// фактический сдвиг.
    fn shift_n(
        &mut self,
        n: usize,
    ) -> usize;

    /// `next_n` + `shift_n`.
    fn read_n(
        &mut self,
        n: usize,
    ) -> (usize, Bytes);

    /// Сколько байт сейчас в буфере.
    fn size(&self) -> usize;

    fn capacity(&self) -> usize;

    /// Записывает байты. Если места не хватает, записывается сколько влезло и
    /// возвращается [`BufferError::CapacityNotEnough`].
    fn write(
        &mut self,
        p: &[u8],
    ) -> Result<usize, BufferError>;

    fn reset(&mut self);

    /// Все байты буфера без сдвига курсора.
    fn bytes(&self) -> Bytes;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
