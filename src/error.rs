use thiserror::Error;

use crate::file::chunk::ChunkId;

#[doc = r#"
Errors that make a byte sequence undecodable.

These are wrapped by [`ReaderError`](crate::reader::ReaderError), which adds the
position in the source where the problem was found.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A channel parameter had its leading bit set
    #[error("Invalid data byte {0:#04X}")]
    InvalidDataByte(u8),
    /// No channel message is defined for this status nibble
    #[error("Unknown channel event (status {status:#04X}, channel {channel})")]
    UnknownChannelEvent {
        /// The status nibble, shifted into the high half of the byte
        status: u8,
        /// Zero based channel taken from the low nibble
        channel: u8,
    },
    /// A data byte showed up where a status byte was required and no
    /// running status was available
    #[error("Data byte found with no running status to continue")]
    UnexpectedRunningStatus,
    /// Meta payload errors
    #[error("Meta event: {0}")]
    Meta(#[from] MetaError),
    /// SMPTE errors
    #[error("SMPTE: {0}")]
    Smpte(#[from] SmpteError),
    /// Chunk errors
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// File errors
    #[error("File: {0}")]
    File(#[from] FileError),
}

/// A meta event payload could not be interpreted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetaError {
    /// The declared payload is too short for the event type
    #[error("{kind} needs {expected} bytes, the payload has {actual}")]
    Length {
        /// Name of the meta event
        kind: &'static str,
        /// Minimum payload length
        expected: usize,
        /// Declared payload length
        actual: usize,
    },
    /// Key signature outside of seven flats to seven sharps
    #[error("Key signature key {0} is outside of -7..=7")]
    Key(i8),
    /// Key signature scale that is neither major (0) nor minor (1)
    #[error("Key signature scale {0} is neither major nor minor")]
    Scale(u8),
    /// The time signature denominator does not fit a 32 bit value
    #[error("Time signature denominator 2^{0} is too large")]
    DenominatorPower(u8),
    /// A time signature denominator that is not a power of two
    #[error("Time signature denominator {0} is not a power of two")]
    Denominator(u32),
    /// Set Tempo with zero microseconds per quarter note
    #[error("Tempo of zero microseconds per quarter note")]
    ZeroTempo,
    /// A time signature with zero beats per bar
    #[error("Time signature numerator must be positive")]
    Numerator,
    /// Channel prefix outside of 0..=15
    #[error("Channel prefix {0} is not a channel")]
    ChannelPrefix(u8),
}

#[doc = r#"
An error relating to SMPTE frame rates and offsets
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmpteError {
    /// The header's division names a frame rate other than -24, -25, -29 or -30
    #[error("Invalid frame rate {0} in header")]
    HeaderFrameTime(i8),
    /// The offset's frame rate bits are not one of the four defined rates
    #[error("Invalid frame rate type {0} in SMPTE offset")]
    TrackFrame(u8),
    /// Hours above 23
    #[error("Invalid hour offset {0}")]
    HourOffset(u8),
    /// Minutes above 59
    #[error("Invalid minute offset {0}")]
    MinuteOffset(u8),
    /// Seconds above 59
    #[error("Invalid second offset {0}")]
    SecondOffset(u8),
    /// Subframes above 99
    #[error("Invalid subframe {0}")]
    Subframe(u8),
    /// The offset payload is not five bytes long
    #[error("SMPTE offset must be 5 bytes, found {0}")]
    Length(usize),
}

/// An error with a chunk's framing or content
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// The track ran out of declared bytes before an end of track event
    #[error("Track chunk has no end of track event")]
    MissingEndOfTrack,
    /// The bytes consumed do not match the length in the chunk header
    #[error("Chunk {id} declared {expected} bytes but {actual} were read")]
    InvalidChunkSize {
        /// Identifier of the chunk
        id: ChunkId,
        /// Length from the chunk header
        expected: u32,
        /// Bytes actually consumed
        actual: usize,
    },
    /// A chunk identifier the reader was told to reject
    #[error("Unknown chunk id {0}")]
    UnknownChunkId(ChunkId),
}

/// An error in the overall structure of a file
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FileError {
    /// The first chunk was not `MThd`
    #[error("File does not start with a header chunk")]
    NoHeaderChunk,
    /// The header chunk is shorter than the six bytes it must contain
    #[error("Header chunk is {0} bytes long, expected at least 6")]
    HeaderLength(u32),
    /// A second `MThd` chunk
    #[error("Found more than one header chunk")]
    DuplicateHeader,
    /// A format other than 0, 1 or 2
    #[error("Unknown file format {0}")]
    UnknownFileFormat(u16),
    /// The header's track count does not match the track chunks found
    #[error("Header announced {expected} track chunks but {actual} were found")]
    UnexpectedTrackChunksCount {
        /// Count from the header
        expected: u16,
        /// Count of track chunks read
        actual: usize,
    },
}

#[doc = r#"
Errors produced while serializing chunks and files
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The bytes written for a chunk differ from the size computed for its header
    #[error("Chunk {id} was sized at {expected} bytes but {actual} were written")]
    InvalidChunkSize {
        /// Identifier of the chunk
        id: ChunkId,
        /// Computed content size
        expected: usize,
        /// Bytes written
        actual: usize,
    },
    /// A file cannot describe more than `u16::MAX` track chunks
    #[error("{0} track chunks do not fit in a file header")]
    TooManyTrackChunks(usize),
    /// A chunk's content does not fit a 32 bit length
    #[error("Chunk {id} content of {size} bytes does not fit a 32 bit length")]
    ChunkTooLarge {
        /// Identifier of the chunk
        id: ChunkId,
        /// Content size
        size: usize,
    },
    /// A value does not fit in a four byte variable length quantity
    #[error("{0} does not fit in a variable length quantity")]
    VarLenOverflow(u64),
}

/// The write result type (see [`WriteError`])
pub type WriteResult<T> = Result<T, WriteError>;
