#![doc = r#"
Contains types for MIDI file chunks

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit length field and then the chunk data.

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
...
[Track Chunk N: "MTrk"]
[Optional Unknown Chunks]
```

The header is handled by [`MidiFile`](crate::file::MidiFile) itself; every other chunk is a
[`MidiChunk`]:

- [`TrackChunk`] (`MTrk`) holds an ordered list of [`TrackEvent`](crate::prelude::TrackEvent)s.
  Its end of track event is implied: it is consumed when reading and appended when writing.
- [`UnknownChunk`] preserves the identifier and bytes of any other chunk so that proprietary
  data survives a read/write cycle.
"#]

mod track;
pub use track::*;

mod unknown;
pub use unknown::*;

use alloc::vec::Vec;
use core::fmt;

use crate::{
    WriteError, WriteResult,
    reader::{ReadResult, Reader},
    settings::{NotEnoughBytesPolicy, ReadSettings, WriteSettings},
    writer::ByteSink,
};

/// A four character chunk identifier
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    /// `MThd`
    pub const HEADER: Self = Self(*b"MThd");
    /// `MTrk`
    pub const TRACK: Self = Self(*b"MTrk");

    /// The raw identifier bytes
    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId(\"{self}\")")
    }
}

/// A chunk other than the header
#[derive(Debug, Clone, PartialEq)]
pub enum MidiChunk {
    /// `MTrk`
    Track(TrackChunk),
    /// Any other identifier
    Unknown(UnknownChunk),
}

impl MidiChunk {
    /// The chunk identifier
    pub const fn id(&self) -> ChunkId {
        match self {
            Self::Track(_) => ChunkId::TRACK,
            Self::Unknown(u) => u.id(),
        }
    }
    /// The track chunk, if this is one
    pub const fn as_track(&self) -> Option<&TrackChunk> {
        match self {
            Self::Track(t) => Some(t),
            Self::Unknown(_) => None,
        }
    }
    /// True for track chunks
    pub const fn is_track(&self) -> bool {
        matches!(self, Self::Track(_))
    }

    /// Write the identifier, the length and the content.
    ///
    /// The length is computed with the same encoder that writes the content;
    /// a mismatch is reported as [`WriteError::InvalidChunkSize`].
    pub(crate) fn write(&self, out: &mut Vec<u8>, settings: &WriteSettings) -> WriteResult<()> {
        let id = self.id();
        let expected = match self {
            Self::Track(track) => track.content_len(settings)?,
            Self::Unknown(unknown) => unknown.data().len(),
        };
        let size = u32::try_from(expected).map_err(|_| WriteError::ChunkTooLarge {
            id,
            size: expected,
        })?;

        out.put_slice(&id.bytes());
        out.put_u32(size);
        let start = out.len();
        match self {
            Self::Track(track) => track.encode(out, settings)?,
            Self::Unknown(unknown) => out.put_slice(unknown.data()),
        }
        let actual = out.len() - start;
        if actual != expected {
            return Err(WriteError::InvalidChunkSize {
                id,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl From<TrackChunk> for MidiChunk {
    fn from(value: TrackChunk) -> Self {
        Self::Track(value)
    }
}

impl From<UnknownChunk> for MidiChunk {
    fn from(value: UnknownChunk) -> Self {
        Self::Unknown(value)
    }
}

/// A chunk's identifier and content as found in the source
pub(crate) struct RawChunk<'a> {
    pub(crate) id: ChunkId,
    pub(crate) declared_len: u32,
    pub(crate) content: Reader<'a>,
    /// The source ended before the declared length
    pub(crate) truncated: bool,
}

impl<'a> RawChunk<'a> {
    /// Split the next chunk off `reader`.
    ///
    /// Under [`NotEnoughBytesPolicy::Ignore`] a chunk whose declared length
    /// reaches past the end of the source keeps whatever bytes remain.
    pub(crate) fn read(reader: &mut Reader<'a>, settings: &ReadSettings) -> ReadResult<Self> {
        let id = ChunkId(reader.read_array()?);
        let declared_len = reader.read_u32()?;
        let content_position = reader.buffer_position();

        let wanted = declared_len as usize;
        let truncated = wanted > reader.remaining();
        let content = if truncated {
            match settings.not_enough_bytes {
                NotEnoughBytesPolicy::Abort => return Err(reader.insufficient(wanted)),
                NotEnoughBytesPolicy::Ignore => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "Chunk {id} declares {wanted} bytes but only {} remain",
                        reader.remaining()
                    );
                    reader.read_up_to(wanted)
                }
            }
        } else {
            reader.read_exact(wanted)?
        };

        Ok(Self {
            id,
            declared_len,
            content: Reader::with_offset(content, content_position),
            truncated,
        })
    }
}

#[test]
fn chunk_id_display() {
    use alloc::format;
    use pretty_assertions::assert_eq;
    assert_eq!(format!("{}", ChunkId::TRACK), "MTrk");
    assert_eq!(format!("{}", ChunkId([b'A', 0, b'B', 0x7F])), "A\\x00B\\x7F");
    assert_eq!(format!("{:?}", ChunkId::HEADER), "ChunkId(\"MThd\")");
}
