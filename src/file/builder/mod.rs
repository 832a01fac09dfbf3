use alloc::vec::Vec;

use super::{
    MidiFile,
    chunk::{ChunkId, MidiChunk, RawChunk, TrackChunk, UnknownChunk},
    header::{HEADER_LENGTH, HeaderChunk},
    timing::Timing,
};
use crate::{
    ChunkError, FileError,
    reader::{ReadResult, ReaderError},
    settings::{
        ExtraTrackChunkPolicy, NoHeaderChunkPolicy, ReadSettings, UnexpectedTrackChunksCountPolicy,
        UnknownChunkIdPolicy,
    },
};

/// What the file reader should do after a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    /// The source was cut short; stop reading chunks
    Stop,
}

/// Collects chunks in file order into a [`MidiFile`].
pub(crate) struct MidiFileBuilder<'s> {
    settings: &'s ReadSettings,
    header: Option<HeaderChunk>,
    /// Set once the first chunk has been seen
    started: bool,
    chunks: Vec<MidiChunk>,
    truncated: bool,
}

impl<'s> MidiFileBuilder<'s> {
    pub(crate) fn new(settings: &'s ReadSettings) -> Self {
        Self {
            settings,
            header: None,
            started: false,
            chunks: Vec::new(),
            truncated: false,
        }
    }

    /// Handles a chunk of a midi file.
    pub(crate) fn handle_chunk(&mut self, raw: RawChunk<'_>) -> ReadResult<Flow> {
        let position = raw.content.buffer_position();
        let first = !core::mem::replace(&mut self.started, true);

        if raw.id == ChunkId::HEADER {
            return self.handle_header(raw, first);
        }
        if first {
            match self.settings.no_header_chunk {
                NoHeaderChunkPolicy::Abort => {
                    return Err(ReaderError::parse_error(position, FileError::NoHeaderChunk));
                }
                NoHeaderChunkPolicy::Ignore => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("File does not start with a header chunk");
                }
            }
        }

        if raw.id == ChunkId::TRACK {
            let skip = self.settings.extra_track_chunk == ExtraTrackChunkPolicy::Skip;
            if skip && self.is_extra_track() {
                #[cfg(feature = "tracing")]
                tracing::debug!("Skipping track chunk beyond the announced count");
                if raw.truncated {
                    self.truncated = true;
                    return Ok(Flow::Stop);
                }
                return Ok(Flow::Continue);
            }
            let read = TrackChunk::read(raw, self.settings)?;
            self.chunks.push(MidiChunk::Track(read.chunk));
            if read.truncated {
                self.truncated = true;
                return Ok(Flow::Stop);
            }
            return Ok(Flow::Continue);
        }

        let truncated = raw.truncated;
        match self.settings.unknown_chunk_id {
            UnknownChunkIdPolicy::ReadAsUnknownChunk => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Keeping unknown chunk {}", raw.id);
                let mut content = raw.content;
                let data = content.read_up_to(content.remaining());
                self.chunks
                    .push(MidiChunk::Unknown(UnknownChunk::new(raw.id, data)));
            }
            UnknownChunkIdPolicy::Skip => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Skipping unknown chunk {}", raw.id);
            }
            UnknownChunkIdPolicy::Abort => {
                return Err(ReaderError::parse_error(
                    position,
                    ChunkError::UnknownChunkId(raw.id),
                ));
            }
        }
        if truncated {
            self.truncated = true;
            return Ok(Flow::Stop);
        }
        Ok(Flow::Continue)
    }

    /// True once the header's track count has been reached
    fn is_extra_track(&self) -> bool {
        self.header.as_ref().is_some_and(|header| {
            self.track_count() >= usize::from(header.track_count())
        })
    }

    fn track_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_track()).count()
    }

    fn handle_header(&mut self, raw: RawChunk<'_>, first: bool) -> ReadResult<Flow> {
        let position = raw.content.buffer_position();
        if self.header.is_some() {
            return Err(ReaderError::parse_error(position, FileError::DuplicateHeader));
        }
        if !first {
            #[cfg(feature = "tracing")]
            tracing::warn!("Header chunk found after other chunks");
        }
        if raw.declared_len < HEADER_LENGTH {
            return Err(ReaderError::parse_error(
                position,
                FileError::HeaderLength(raw.declared_len),
            ));
        }
        let mut content = raw.content;
        self.header = Some(HeaderChunk::read(&mut content, self.settings)?);
        Ok(Flow::Continue)
    }

    /// Attempts to finish the midifile from the provided chunks.
    pub(crate) fn build(self) -> Result<MidiFile, FileError> {
        let actual = self.track_count();
        let header = match self.header {
            Some(header) => header,
            // an empty source, or one where every chunk was tolerated without a header
            None if self.settings.no_header_chunk == NoHeaderChunkPolicy::Ignore => {
                return Ok(MidiFile {
                    timing: Timing::default(),
                    original_format: None,
                    chunks: self.chunks,
                });
            }
            None => return Err(FileError::NoHeaderChunk),
        };

        if !self.truncated && actual != usize::from(header.track_count()) {
            match self.settings.unexpected_track_chunks_count {
                UnexpectedTrackChunksCountPolicy::Abort => {
                    return Err(FileError::UnexpectedTrackChunksCount {
                        expected: header.track_count(),
                        actual,
                    });
                }
                UnexpectedTrackChunksCountPolicy::Ignore => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "Header announces {} track chunks, found {actual}",
                        header.track_count()
                    );
                }
            }
        }

        Ok(MidiFile {
            timing: header.timing(),
            original_format: header.format(),
            chunks: self.chunks,
        })
    }
}
