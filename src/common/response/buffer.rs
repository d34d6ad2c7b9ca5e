// src/common/response/buffer.rs

use arrayvec::ArrayVec;

use crate::common::timing::RESPONSE_CAPACITY;

/// One line of sensor output, terminator excluded.
///
/// Overwritten by every read; its contents are only meaningful until the
/// next command is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBuffer {
    bytes: ArrayVec<u8, RESPONSE_CAPACITY>,
}

impl ResponseBuffer {
    pub const CAPACITY: usize = RESPONSE_CAPACITY;

    pub fn new() -> Self {
        ResponseBuffer { bytes: ArrayVec::new() }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Appends a byte; returns `false` if the buffer is already full.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        self.bytes.try_push(byte).is_ok()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.bytes.is_full()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The first byte, which is the responding sensor's address.
    #[inline]
    pub fn first(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Drops trailing spaces and control characters some sensors pad with.
    pub fn trim_trailing_whitespace(&mut self) {
        while matches!(self.bytes.last(), Some(&b) if b <= b' ') {
            self.bytes.pop();
        }
    }
}

impl AsRef<[u8]> for ResponseBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut buf = ResponseBuffer::new();
        for _ in 0..ResponseBuffer::CAPACITY {
            assert!(buf.push(b'x'));
        }
        assert!(buf.is_full());
        assert!(!buf.push(b'y'));
        assert_eq!(buf.len(), ResponseBuffer::CAPACITY);
    }

    #[test]
    fn test_trim_trailing() {
        let mut buf = ResponseBuffer::new();
        for &b in b"0+1.5  \t" {
            buf.push(b);
        }
        buf.trim_trailing_whitespace();
        assert_eq!(buf.as_bytes(), b"0+1.5");

        buf.clear();
        assert!(buf.is_empty());
        buf.trim_trailing_whitespace();
        assert_eq!(buf.first(), None);
    }
}
