#![doc = r#"
Rusty representation of a [`MidiFile`]

A file is its timing, the format it was read with, and every chunk after the
header in file order. Writing picks the target format and reshapes the chunks
with that format's [`ChunksConverter`](topology::ChunksConverter).
"#]

mod builder;

pub mod chunk;

mod format;
pub use format::*;

/// The `MThd` chunk
pub mod header;

/// Time division: ticks per quarter note or SMPTE frames
pub mod timing;

pub mod topology;

use alloc::vec::Vec;

use crate::{
    WriteError, WriteResult,
    file::{
        builder::{Flow, MidiFileBuilder},
        chunk::{MidiChunk, RawChunk, TrackChunk},
        header::HeaderChunk,
        timing::Timing,
    },
    reader::{ReadResult, Reader, ReaderError},
    settings::{ReadSettings, WriteSettings},
    tempo::TempoMap,
};

#[doc = r#"
A Standard MIDI File in memory

```rust
use smfkit::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 8, 0x00, 0x90, 60, 100, 0x00, 0xFF, 0x2F, 0x00,
];
let file = MidiFile::parse(&bytes, &ReadSettings::default()).unwrap();
assert_eq!(file.original_format(), Some(FormatType::SingleMultiChannel));
assert_eq!(file.timing().ticks_per_quarter_note(), Some(96));

let written = file.write(FormatType::SingleMultiChannel, &WriteSettings::default()).unwrap();
assert_eq!(written, bytes);
```
"#]
#[derive(Clone, Debug, PartialEq)]
pub struct MidiFile {
    timing: Timing,
    original_format: Option<FormatType>,
    chunks: Vec<MidiChunk>,
}

impl MidiFile {
    /// Create a file from its timing and chunks
    pub fn new(timing: Timing, chunks: Vec<MidiChunk>) -> Self {
        Self {
            timing,
            original_format: None,
            chunks,
        }
    }

    /// Parse a set of bytes into a file struct
    pub fn parse(bytes: &[u8], settings: &ReadSettings) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut builder = MidiFileBuilder::new(settings);

        while !reader.is_at_end() {
            let raw = RawChunk::read(&mut reader, settings)?;
            if builder.handle_chunk(raw)? == Flow::Stop {
                break;
            }
        }

        builder
            .build()
            .map_err(|e| ReaderError::parse_error(reader.buffer_position(), e))
    }

    /// Write the file in `format`.
    ///
    /// The chunks are first reshaped by the format's converter; the file in
    /// memory is left as it is.
    pub fn write(&self, format: FormatType, settings: &WriteSettings) -> WriteResult<Vec<u8>> {
        let mut chunks = format.converter().convert(&self.chunks);
        if settings.delete_unknown_chunks {
            chunks.retain(MidiChunk::is_track);
        }
        let track_count = chunks.iter().filter(|c| c.is_track()).count();
        let track_count =
            u16::try_from(track_count).map_err(|_| WriteError::TooManyTrackChunks(track_count))?;

        let mut out = Vec::new();
        HeaderChunk::new(format, track_count, self.timing).write(&mut out);
        for chunk in &chunks {
            chunk.write(&mut out, settings)?;
        }
        Ok(out)
    }

    /// Returns header info
    pub const fn timing(&self) -> Timing {
        self.timing
    }
    /// Replace the timing
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }
    /// The format the file was read with, if it was read and the format was known
    pub const fn original_format(&self) -> Option<FormatType> {
        self.original_format
    }
    /// Every chunk after the header, in file order
    pub fn chunks(&self) -> &[MidiChunk] {
        &self.chunks
    }
    /// Mutable access to the chunks
    pub fn chunks_mut(&mut self) -> &mut Vec<MidiChunk> {
        &mut self.chunks
    }
    /// Take the chunks
    pub fn into_chunks(self) -> Vec<MidiChunk> {
        self.chunks
    }
    /// The track chunks, in file order
    pub fn track_chunks(&self) -> impl Iterator<Item = &TrackChunk> {
        self.chunks.iter().filter_map(MidiChunk::as_track)
    }

    /// Build the tempo map of the file.
    ///
    /// The map is a snapshot; rebuild it after editing tempo or time signature events.
    pub fn tempo_map(&self) -> TempoMap {
        TempoMap::from_chunks(self.timing, &self.chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ChunkError, FileError, ParseError,
        prelude::*,
        settings::{
            ExtraTrackChunkPolicy, NoHeaderChunkPolicy, UnexpectedTrackChunksCountPolicy,
            UnknownChunkIdPolicy, UnknownFileFormatPolicy,
        },
    };
    use alloc::vec;
    use pretty_assertions::assert_eq;

    const TRACK: [u8; 12] = [
        b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00,
    ];

    fn header(format: u16, tracks: u16) -> Vec<u8> {
        let mut bytes = b"MThd\x00\x00\x00\x06".to_vec();
        bytes.extend(format.to_be_bytes());
        bytes.extend(tracks.to_be_bytes());
        bytes.extend([0x00, 0x60]);
        bytes
    }

    fn concat(parts: &[&[u8]]) -> Vec<u8> {
        parts.concat()
    }

    fn parse_error(result: ReadResult<MidiFile>) -> ParseError {
        match result.unwrap_err().error_kind() {
            ReaderErrorKind::ParseError(e) => e.clone(),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn header_must_come_first() {
        let bytes = concat(&[&TRACK, &header(0, 1)]);
        assert_eq!(
            parse_error(MidiFile::parse(&bytes, &ReadSettings::default())),
            ParseError::File(FileError::NoHeaderChunk)
        );

        let tolerant = ReadSettings {
            no_header_chunk: NoHeaderChunkPolicy::Ignore,
            ..Default::default()
        };
        let file = MidiFile::parse(&TRACK, &tolerant).unwrap();
        assert_eq!(file.timing(), Timing::default());
        assert_eq!(file.track_chunks().count(), 1);
    }

    #[test]
    fn duplicate_header() {
        let bytes = concat(&[&header(0, 0), &header(0, 0)]);
        assert_eq!(
            parse_error(MidiFile::parse(&bytes, &ReadSettings::default())),
            ParseError::File(FileError::DuplicateHeader)
        );
    }

    #[test]
    fn unknown_format() {
        let bytes = concat(&[&header(7, 1), &TRACK]);
        let file = MidiFile::parse(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(file.original_format(), None);

        let strict = ReadSettings {
            unknown_file_format: UnknownFileFormatPolicy::Abort,
            ..Default::default()
        };
        assert_eq!(
            parse_error(MidiFile::parse(&bytes, &strict)),
            ParseError::File(FileError::UnknownFileFormat(7))
        );
    }

    #[test]
    fn track_count_mismatch() {
        let bytes = concat(&[&header(1, 3), &TRACK]);
        assert!(MidiFile::parse(&bytes, &ReadSettings::default()).is_ok());

        let strict = ReadSettings {
            unexpected_track_chunks_count: UnexpectedTrackChunksCountPolicy::Abort,
            ..Default::default()
        };
        assert_eq!(
            parse_error(MidiFile::parse(&bytes, &strict)),
            ParseError::File(FileError::UnexpectedTrackChunksCount {
                expected: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn extra_track_chunks() {
        let note = [
            b'M', b'T', b'r', b'k', 0, 0, 0, 8, 0x00, 0x90, 0x3C, 0x40, 0x00, 0xFF, 0x2F, 0x00,
        ];
        let bytes = concat(&[&header(1, 1), &TRACK, &note]);
        assert_eq!(
            MidiFile::parse(&bytes, &ReadSettings::default())
                .unwrap()
                .track_chunks()
                .count(),
            2
        );

        let skip = ReadSettings::strict().with_extra_track_chunk(ExtraTrackChunkPolicy::Skip);
        let file = MidiFile::parse(&bytes, &skip).unwrap();
        assert_eq!(file.chunks(), [MidiChunk::Track(TrackChunk::default())]);
    }

    #[test]
    fn unknown_chunk_policies() {
        let custom = [b'X', b'F', b'I', b'H', 0, 0, 0, 2, 0xAB, 0xCD];
        let bytes = concat(&[&header(1, 1), &custom, &TRACK]);

        let kept = MidiFile::parse(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(
            kept.chunks()[0],
            MidiChunk::Unknown(UnknownChunk::new(ChunkId(*b"XFIH"), [0xAB, 0xCD]))
        );

        let skip = ReadSettings::default().with_unknown_chunk_id(UnknownChunkIdPolicy::Skip);
        assert_eq!(MidiFile::parse(&bytes, &skip).unwrap().chunks().len(), 1);

        let abort = ReadSettings::default().with_unknown_chunk_id(UnknownChunkIdPolicy::Abort);
        assert_eq!(
            parse_error(MidiFile::parse(&bytes, &abort)),
            ParseError::Chunk(ChunkError::UnknownChunkId(ChunkId(*b"XFIH")))
        );
    }

    #[test]
    fn unknown_chunks_written_after_tracks() {
        let unknown = MidiChunk::Unknown(UnknownChunk::new(ChunkId(*b"XFIH"), [1]));
        let file = MidiFile::new(
            Timing::default(),
            vec![unknown.clone(), TrackChunk::default().into()],
        );
        let bytes = file
            .write(FormatType::SequentiallyIndependent, &WriteSettings::default())
            .unwrap();
        let expected = concat(&[&header(2, 1), &TRACK, b"XFIH\x00\x00\x00\x01\x01"]);
        assert_eq!(bytes, expected);

        let compressed = file
            .write(FormatType::SequentiallyIndependent, &WriteSettings::compressed())
            .unwrap();
        assert_eq!(compressed, concat(&[&header(2, 1), &TRACK]));
    }
}
