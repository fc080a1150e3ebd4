use bytes::Bytes;

use crate::buffer::Buffer;

/// Кодек кадров: `decode` извлекает кадр из входящих данных, `encode`
/// готовит данные к отправке.
pub trait Codec: Send + Sync {
    fn encode(
        &self,
        data: &[u8],
    ) -> Bytes;

    /// `None`, если полного кадра ещё нет.
    fn decode(
        &self,
        buf: &mut dyn Buffer,
    ) -> Option<Bytes>;
}

/// Кодек без преобразований: всё накопленное считается одним кадром.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCodec;

impl Codec for PassthroughCodec {
    fn encode(
        &self,
        data: &[u8],
    ) -> Bytes {
        Bytes::copy_from_slice(data)
    }

    fn decode(
        &self,
        buf: &mut dyn Buffer,
    ) -> Option<Bytes> {
        if buf.is_empty() {
            return None;
        }
        let size = buf.size();
        let (_, frame) = buf.read_n(size);
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RingBuffer;

    #[test]
    fn test_passthrough_encode() {
        assert_eq!(PassthroughCodec.encode(b"ping"), Bytes::from_static(b"ping"));
    }

    /// Тест проверяет, что decode забирает все данные и оставляет буфер
    /// пустым.
    #[test]
    fn test_passthrough_decode_drains_buffer() {
        let mut buf = RingBuffer::new(16);
        assert!(PassthroughCodec.decode(&mut buf).is_none());

        buf.write(b"hello").unwrap();
        assert_eq!(
            PassthroughCodec.decode(&mut buf),
            Some(Bytes::from_static(b"hello"))
        );
        assert!(buf.is_empty());
        assert!(PassthroughCodec.decode(&mut buf).is_none());
    }
}
