#![doc = r#"
Common re-exports
"#]

pub use crate::{
    byte::*,
    codec::RunningStatus,
    error::*,
    file::{
        FormatType, MidiFile,
        chunk::{ChunkId, MidiChunk, TrackChunk, UnknownChunk},
        header::HeaderChunk,
        timing::*,
        topology::{self, ChunksConverter},
    },
    message::{
        Ticked, TrackEvent, TrackMessage,
        channel::*,
        meta::*,
        system::*,
    },
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
    settings::*,
    tempo::TempoMap,
    time::{
        self, BarBeatTime, ConversionError, ConversionResult, MetricTime, MidiTime, MusicalTime,
        TimeSpan,
    },
};
