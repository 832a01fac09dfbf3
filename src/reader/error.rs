use crate::{ChunkError, ParseError};
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading bytes into chunks and events
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Reading at position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("Parsing {0}")]
    ParseError(#[from] ParseError),
    /// A read or a declared length reaches past the available data
    #[error("Needed {expected} bytes but only {available} are available")]
    InsufficientBytes {
        /// Bytes requested
        expected: usize,
        /// Bytes left in the source
        available: usize,
    },
}

impl ReaderErrorKind {
    pub(crate) fn chunk(chunk_err: ChunkError) -> Self {
        Self::ParseError(ParseError::Chunk(chunk_err))
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the source ended before the data it declared
    pub const fn is_insufficient_bytes(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::InsufficientBytes { .. })
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new parse error
    pub fn parse_error(position: usize, error: impl Into<ParseError>) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::ParseError(error.into()),
        }
    }

    /// Create a new insufficient bytes error
    pub const fn insufficient(position: usize, expected: usize, available: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::InsufficientBytes {
                expected,
                available,
            },
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
