#![doc = r#"
A forward cursor over MIDI bytes.

The [`Reader`] tracks an absolute position so that errors can point at the
offending byte, supports the one byte rewind needed by running status, and
reads the big endian integers and variable length quantities the file format
is built from.
"#]

mod error;
pub use error::*;

/// Largest number of bytes a variable length quantity may occupy
pub(crate) const MAX_VARLEN_BYTES: usize = 4;

/// A cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Start reading at the beginning of `data`
    pub const fn from_byte_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            offset: 0,
        }
    }

    /// A reader over a region of a larger source.
    ///
    /// Reported positions are shifted by `offset`.
    pub(crate) const fn with_offset(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            position: 0,
            offset,
        }
    }

    /// The absolute position of the next byte to be read
    pub const fn buffer_position(&self) -> usize {
        self.offset + self.position
    }

    /// The number of bytes consumed from this reader's own region
    pub const fn consumed(&self) -> usize {
        self.position
    }

    /// Bytes left to read
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True once every byte has been consumed
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Look at the next byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    /// Move back by a single byte.
    ///
    /// Used when a data byte is found in place of a status byte.
    pub fn step_back(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Consume one byte
    pub fn read_byte(&mut self) -> ReadResult<u8> {
        let byte = self.peek().ok_or_else(|| self.insufficient(1))?;
        self.position += 1;
        Ok(byte)
    }

    /// Consume exactly `len` bytes
    pub fn read_exact(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.insufficient(len));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.data[start..self.position])
    }

    /// Consume a fixed size array
    pub fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    /// Consume up to `len` bytes, returning whatever is available
    pub(crate) fn read_up_to(&mut self, len: usize) -> &'a [u8] {
        let len = len.min(self.remaining());
        let start = self.position;
        self.position += len;
        &self.data[start..self.position]
    }

    /// Skip `len` bytes
    pub fn skip(&mut self, len: usize) -> ReadResult<()> {
        self.read_exact(len).map(|_| ())
    }

    /// Big endian u16
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    /// Big endian u32
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// A variable length quantity of at most four bytes.
    ///
    /// Each byte contributes its low seven bits; a clear leading bit ends the
    /// value. The fourth byte always ends it.
    pub fn read_varlen(&mut self) -> ReadResult<u32> {
        let mut value: u32 = 0;
        for _ in 0..MAX_VARLEN_BYTES {
            let byte = self.read_byte()?;
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Ok(value)
    }

    pub(crate) fn insufficient(&self, expected: usize) -> ReaderError {
        ReaderError::insufficient(self.buffer_position(), expected, self.remaining())
    }

    pub(crate) fn parse_error(&self, error: impl Into<crate::ParseError>) -> ReaderError {
        ReaderError::parse_error(self.buffer_position(), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn varlen_values() {
        let cases: [(&[u8], u32); 6] = [
            (&[0x00], 0),
            (&[0x7F], 0x7F),
            (&[0x81, 0x00], 0x80),
            (&[0xC0, 0x00], 0x2000),
            (&[0xFF, 0x7F], 0x3FFF),
            (&[0xFF, 0xFF, 0xFF, 0x7F], 0x0FFF_FFFF),
        ];
        for (bytes, expected) in cases {
            let mut reader = Reader::from_byte_slice(bytes);
            assert_eq!(reader.read_varlen().unwrap(), expected);
            assert!(reader.is_at_end());
        }
    }

    #[test]
    fn truncated_varlen() {
        let mut reader = Reader::from_byte_slice(&[0x81, 0x80]);
        let err = reader.read_varlen().unwrap_err();
        assert!(err.is_insufficient_bytes());
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn step_back_rereads() {
        let mut reader = Reader::from_byte_slice(&[0x15, 0x56]);
        assert_eq!(reader.read_byte().unwrap(), 0x15);
        reader.step_back();
        assert_eq!(reader.read_byte().unwrap(), 0x15);
        assert_eq!(reader.read_byte().unwrap(), 0x56);
    }

    #[test]
    fn offset_positions() {
        let mut reader = Reader::with_offset(&[1, 2, 3], 100);
        reader.skip(2).unwrap();
        assert_eq!(reader.buffer_position(), 102);
        let err = reader.read_exact(4).unwrap_err();
        assert_eq!(
            err,
            ReaderError::insufficient(102, 4, 1)
        );
    }
}
