use alloc::vec::Vec;

use crate::{WriteError, WriteResult, reader::MAX_VARLEN_BYTES};

/// Largest value a four byte variable length quantity can hold
pub(crate) const MAX_VARLEN: u32 = 0x0FFF_FFFF;

/// Destination for encoded bytes.
///
/// Encoders are written once against this trait and run either into a
/// [`Vec<u8>`] or into a [`ByteCounter`], so the size computed for a chunk
/// header always equals the bytes later written.
pub(crate) trait ByteSink {
    fn put(&mut self, byte: u8);

    fn put_slice(&mut self, bytes: &[u8]);

    fn put_u16(&mut self, value: u16) {
        self.put_slice(&value.to_be_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.put_slice(&value.to_be_bytes());
    }

    fn put_varlen(&mut self, value: u32) -> WriteResult<()> {
        if value > MAX_VARLEN {
            return Err(WriteError::VarLenOverflow(value.into()));
        }
        let mut buf = [0u8; MAX_VARLEN_BYTES];
        let mut start = MAX_VARLEN_BYTES - 1;
        let mut rest = value;
        buf[start] = (rest & 0x7F) as u8;
        rest >>= 7;
        while rest > 0 {
            start -= 1;
            buf[start] = ((rest & 0x7F) as u8) | 0x80;
            rest >>= 7;
        }
        self.put_slice(&buf[start..]);
        Ok(())
    }

    /// A payload length followed by the payload
    fn put_sized(&mut self, bytes: &[u8]) -> WriteResult<()> {
        let len = u32::try_from(bytes.len())
            .map_err(|_| WriteError::VarLenOverflow(bytes.len() as u64))?;
        self.put_varlen(len)?;
        self.put_slice(bytes);
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn put(&mut self, byte: u8) {
        self.push(byte);
    }
    fn put_slice(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// A sink that only counts what would have been written
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ByteCounter(usize);

impl ByteCounter {
    pub(crate) const fn count(&self) -> usize {
        self.0
    }
}

impl ByteSink for ByteCounter {
    fn put(&mut self, _byte: u8) {
        self.0 += 1;
    }
    fn put_slice(&mut self, bytes: &[u8]) {
        self.0 += bytes.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use pretty_assertions::assert_eq;

    #[test]
    fn varlen_encoding() {
        let mut out = Vec::new();
        out.put_varlen(0x2000).unwrap();
        assert_eq!(out, [0xC0, 0x00]);

        let mut out = Vec::new();
        out.put_varlen(MAX_VARLEN).unwrap();
        assert_eq!(out, [0xFF, 0xFF, 0xFF, 0x7F]);
        assert_eq!(Reader::from_byte_slice(&out).read_varlen().unwrap(), MAX_VARLEN);
    }

    #[test]
    fn varlen_overflow() {
        let mut counter = ByteCounter::default();
        assert_eq!(
            counter.put_varlen(MAX_VARLEN + 1),
            Err(WriteError::VarLenOverflow(0x1000_0000))
        );
        assert_eq!(counter.count(), 0);
    }
}
