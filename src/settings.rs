#![doc = r#"
Reading and writing configuration.

[`ReadSettings`] decides which malformed inputs are fatal and which are
tolerated with a well defined outcome. [`WriteSettings`] toggles the
space saving transforms applied while serializing track chunks.

Both are plain data with sensible defaults; with the `serde` feature they
can be loaded from any serde format (the custom meta registry is skipped).
"#]

use crate::message::meta::{CustomMetaEvent, CustomMetaRegistry};

/// What to do when a track chunk ends without an end of track event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissingEndOfTrackPolicy {
    /// Keep the events read up to the end of the chunk
    #[default]
    Ignore,
    /// Fail with [`ChunkError::MissingEndOfTrack`](crate::ChunkError::MissingEndOfTrack)
    Abort,
}

/// What to do when a declared length reaches past the end of the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotEnoughBytesPolicy {
    /// Fail with an [`InsufficientBytes`] error
    ///
    /// [`InsufficientBytes`]: crate::reader::ReaderErrorKind::InsufficientBytes
    #[default]
    Abort,
    /// Keep everything decoded before the data ran out and stop reading
    Ignore,
}

/// How a Note On with zero velocity is represented after reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SilentNoteOnPolicy {
    /// Rewrite it to a Note Off with the same note and velocity
    #[default]
    NoteOff,
    /// Leave it as a Note On
    NoteOn,
}

/// What to do with a channel or system common parameter that has its leading bit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidDataBytePolicy {
    /// Fail with [`ParseError::InvalidDataByte`](crate::ParseError::InvalidDataByte)
    #[default]
    Abort,
    /// Keep the low seven bits
    ReadValid,
    /// Clamp to `0x7F`
    SnapToLimits,
}

/// What to do with a meta event parameter outside of its defined range.
///
/// Covers channel prefixes, key signatures and the time fields of SMPTE offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidMetaValuePolicy {
    /// Fail with [`ParseError::Meta`](crate::ParseError::Meta) or
    /// [`ParseError::Smpte`](crate::ParseError::Smpte)
    #[default]
    Abort,
    /// Clamp the value to the nearest limit
    SnapToLimits,
}

/// What to do with track chunks beyond the count the header announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtraTrackChunkPolicy {
    /// Read them like any other track chunk
    #[default]
    Read,
    /// Drop them unread
    Skip,
}

/// What to do with chunks whose identifier is neither `MThd` nor `MTrk`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnknownChunkIdPolicy {
    /// Keep the chunk as opaque bytes
    #[default]
    ReadAsUnknownChunk,
    /// Drop the chunk
    Skip,
    /// Fail with [`ChunkError::UnknownChunkId`](crate::ChunkError::UnknownChunkId)
    Abort,
}

/// What to do with a header format other than 0, 1 or 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnknownFileFormatPolicy {
    /// Read the file and report no original format
    #[default]
    Ignore,
    /// Fail with [`FileError::UnknownFileFormat`](crate::FileError::UnknownFileFormat)
    Abort,
}

/// What to do when the first chunk is not a header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoHeaderChunkPolicy {
    /// Fail with [`FileError::NoHeaderChunk`](crate::FileError::NoHeaderChunk)
    #[default]
    Abort,
    /// Read the chunks with a default timing of 96 ticks per quarter note
    Ignore,
}

/// What to do when the header's track count disagrees with the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnexpectedTrackChunksCountPolicy {
    /// Keep every track chunk found
    #[default]
    Ignore,
    /// Fail with [`FileError::UnexpectedTrackChunksCount`]
    ///
    /// [`FileError::UnexpectedTrackChunksCount`]: crate::FileError::UnexpectedTrackChunksCount
    Abort,
}

/// Policies applied while reading
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReadSettings {
    /// See [`MissingEndOfTrackPolicy`]
    pub missing_end_of_track: MissingEndOfTrackPolicy,
    /// See [`NotEnoughBytesPolicy`]
    pub not_enough_bytes: NotEnoughBytesPolicy,
    /// See [`SilentNoteOnPolicy`]
    pub silent_note_on: SilentNoteOnPolicy,
    /// See [`InvalidDataBytePolicy`]
    pub invalid_data_byte: InvalidDataBytePolicy,
    /// See [`InvalidMetaValuePolicy`]
    pub invalid_meta_value: InvalidMetaValuePolicy,
    /// See [`UnknownChunkIdPolicy`]
    pub unknown_chunk_id: UnknownChunkIdPolicy,
    /// See [`UnknownFileFormatPolicy`]
    pub unknown_file_format: UnknownFileFormatPolicy,
    /// See [`NoHeaderChunkPolicy`]
    pub no_header_chunk: NoHeaderChunkPolicy,
    /// See [`UnexpectedTrackChunksCountPolicy`]
    pub unexpected_track_chunks_count: UnexpectedTrackChunksCountPolicy,
    /// See [`ExtraTrackChunkPolicy`]
    pub extra_track_chunk: ExtraTrackChunkPolicy,
    /// Meta event types decoded by caller supplied types
    #[cfg_attr(feature = "serde", serde(skip))]
    pub custom_meta_types: CustomMetaRegistry,
}

impl ReadSettings {
    /// Every recoverable condition becomes an error.
    pub fn strict() -> Self {
        Self {
            missing_end_of_track: MissingEndOfTrackPolicy::Abort,
            not_enough_bytes: NotEnoughBytesPolicy::Abort,
            silent_note_on: SilentNoteOnPolicy::NoteOn,
            invalid_data_byte: InvalidDataBytePolicy::Abort,
            invalid_meta_value: InvalidMetaValuePolicy::Abort,
            unknown_chunk_id: UnknownChunkIdPolicy::Abort,
            unknown_file_format: UnknownFileFormatPolicy::Abort,
            no_header_chunk: NoHeaderChunkPolicy::Abort,
            unexpected_track_chunks_count: UnexpectedTrackChunksCountPolicy::Abort,
            extra_track_chunk: ExtraTrackChunkPolicy::Read,
            custom_meta_types: CustomMetaRegistry::default(),
        }
    }

    /// Set the missing end of track policy
    pub fn with_missing_end_of_track(mut self, policy: MissingEndOfTrackPolicy) -> Self {
        self.missing_end_of_track = policy;
        self
    }

    /// Set the not enough bytes policy
    pub fn with_not_enough_bytes(mut self, policy: NotEnoughBytesPolicy) -> Self {
        self.not_enough_bytes = policy;
        self
    }

    /// Set the silent note on policy
    pub fn with_silent_note_on(mut self, policy: SilentNoteOnPolicy) -> Self {
        self.silent_note_on = policy;
        self
    }

    /// Set the invalid data byte policy
    pub fn with_invalid_data_byte(mut self, policy: InvalidDataBytePolicy) -> Self {
        self.invalid_data_byte = policy;
        self
    }

    /// Set the invalid meta value policy
    pub fn with_invalid_meta_value(mut self, policy: InvalidMetaValuePolicy) -> Self {
        self.invalid_meta_value = policy;
        self
    }

    /// Set the extra track chunk policy
    pub fn with_extra_track_chunk(mut self, policy: ExtraTrackChunkPolicy) -> Self {
        self.extra_track_chunk = policy;
        self
    }

    /// Set the unknown chunk id policy
    pub fn with_unknown_chunk_id(mut self, policy: UnknownChunkIdPolicy) -> Self {
        self.unknown_chunk_id = policy;
        self
    }

    /// Decode meta events with `status` as `T`
    pub fn with_custom_meta<T>(mut self, status: u8) -> Self
    where
        T: CustomMetaEvent + Default + 'static,
    {
        self.custom_meta_types.register::<T>(status);
        self
    }
}

#[doc = r#"
Transforms applied while writing track chunks.

Everything is off by default, which writes events exactly as they are held
in memory. The transforms that drop events move the dropped event's delta
onto the next written event, so absolute positions never shift.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriteSettings {
    /// Omit a channel status byte equal to the previous one
    pub use_running_status: bool,
    /// Drop meta events of unknown type
    pub delete_unknown_meta_events: bool,
    /// Write Note Off as a Note On with zero velocity
    pub note_off_as_silent_note_on: bool,
    /// Drop the first tempo event if it holds the default tempo
    pub delete_default_set_tempo: bool,
    /// Drop the first key signature if it is C major
    pub delete_default_key_signature: bool,
    /// Drop the first time signature if it is 4/4
    pub delete_default_time_signature: bool,
    /// Drop chunks that are not track chunks
    pub delete_unknown_chunks: bool,
}

impl WriteSettings {
    /// Every transform enabled
    pub const fn compressed() -> Self {
        Self {
            use_running_status: true,
            delete_unknown_meta_events: true,
            note_off_as_silent_note_on: true,
            delete_default_set_tempo: true,
            delete_default_key_signature: true,
            delete_default_time_signature: true,
            delete_unknown_chunks: true,
        }
    }

    /// Set running status
    pub const fn with_running_status(mut self, enabled: bool) -> Self {
        self.use_running_status = enabled;
        self
    }

    /// Set note off rewriting
    pub const fn with_note_off_as_silent_note_on(mut self, enabled: bool) -> Self {
        self.note_off_as_silent_note_on = enabled;
        self
    }

    /// Set default time signature elision
    pub const fn with_delete_default_time_signature(mut self, enabled: bool) -> Self {
        self.delete_default_time_signature = enabled;
        self
    }
}
