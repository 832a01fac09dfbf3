use alloc::{borrow::Cow, vec::Vec};

use super::{ChunkId, RawChunk};
use crate::{
    ChunkError, WriteResult,
    codec::{RunningStatus, encode_event, read_message},
    message::{
        Ticked, TrackEvent, TrackMessage,
        meta::{KeySignature, MetaMessage, Tempo, TimeSignature},
    },
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
    settings::{MissingEndOfTrackPolicy, NotEnoughBytesPolicy, ReadSettings, WriteSettings},
    writer::{ByteCounter, ByteSink},
};

#[doc = r#"
An `MTrk` chunk: an ordered list of events with delta times.

The end of track event is not stored. Reading stops at it and writing
always appends exactly one, carrying whatever delta is left over.
"#]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackChunk {
    events: Vec<TrackEvent>,
}

/// The outcome of reading one track chunk
pub(crate) struct TrackRead {
    pub(crate) chunk: TrackChunk,
    /// Reading stopped early because the data ran out
    pub(crate) truncated: bool,
}

impl TrackChunk {
    /// Create a chunk from events
    pub fn new(events: Vec<TrackEvent>) -> Self {
        Self { events }
    }
    /// The events in order
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }
    /// Mutable access to the events
    pub fn events_mut(&mut self) -> &mut Vec<TrackEvent> {
        &mut self.events
    }
    /// Take the events
    pub fn into_events(self) -> Vec<TrackEvent> {
        self.events
    }
    /// Append an event
    pub fn push(&mut self, event: TrackEvent) {
        self.events.push(event);
    }
    /// Number of events, not counting the implied end of track
    pub fn len(&self) -> usize {
        self.events.len()
    }
    /// True if there are no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Each event with its absolute tick, the running sum of deltas
    pub fn ticked_events(&self) -> impl Iterator<Item = Ticked<&TrackEvent>> {
        self.events.iter().scan(0u64, |ticks, event| {
            *ticks += u64::from(event.delta_ticks());
            Some(Ticked::new(*ticks, event))
        })
    }

    /// Decode the content of a track chunk, without the `MTrk` framing
    pub fn read_content(content: &[u8], settings: &ReadSettings) -> ReadResult<Self> {
        let raw = RawChunk {
            id: ChunkId::TRACK,
            declared_len: content.len() as u32,
            content: Reader::from_byte_slice(content),
            truncated: false,
        };
        Self::read(raw, settings).map(|read| read.chunk)
    }

    /// Encode the content of a track chunk, without the `MTrk` framing
    pub fn write_content(&self, settings: &WriteSettings) -> WriteResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out, settings)?;
        Ok(out)
    }

    /// The number of bytes [`TrackChunk::write_content`] produces
    pub fn content_len(&self, settings: &WriteSettings) -> WriteResult<usize> {
        let mut counter = ByteCounter::default();
        self.encode(&mut counter, settings)?;
        Ok(counter.count())
    }

    pub(crate) fn read(raw: RawChunk<'_>, settings: &ReadSettings) -> ReadResult<TrackRead> {
        let RawChunk {
            id,
            declared_len,
            mut content,
            truncated,
        } = raw;
        let mut running_status = RunningStatus::new();
        let mut events = Vec::new();
        // deltas of status bytes that decode to nothing
        let mut pending_delta: u32 = 0;
        let mut ended = false;

        while !content.is_at_end() {
            let next = content.read_varlen().and_then(|delta| {
                read_message(&mut content, &mut running_status, settings).map(|m| (delta, m))
            });
            let (delta, message) = match next {
                Ok(decoded) => decoded,
                Err(e) => {
                    let ReaderErrorKind::InsufficientBytes { expected, .. } = e.kind else {
                        return Err(e);
                    };
                    if !truncated {
                        // the chunk is complete, so the event overruns its declared length
                        let actual = content.consumed() + expected;
                        return Err(ReaderError::new(
                            e.position(),
                            ReaderErrorKind::chunk(ChunkError::InvalidChunkSize {
                                id,
                                expected: declared_len,
                                actual,
                            }),
                        ));
                    }
                    match settings.not_enough_bytes {
                        NotEnoughBytesPolicy::Abort => return Err(e),
                        NotEnoughBytesPolicy::Ignore => {
                            #[cfg(feature = "tracing")]
                            tracing::warn!(
                                "Track chunk cut short after {} events: {e}",
                                events.len()
                            );
                            return Ok(TrackRead {
                                chunk: Self { events },
                                truncated: true,
                            });
                        }
                    }
                }
            };

            let delta = delta.saturating_add(core::mem::take(&mut pending_delta));
            match message {
                Some(TrackMessage::Meta(MetaMessage::EndOfTrack)) => {
                    ended = true;
                    break;
                }
                Some(message) => events.push(TrackEvent::new(delta, message)),
                None => pending_delta = delta,
            }
        }

        if ended && !content.is_at_end() {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                "Skipping {} bytes after end of track",
                content.remaining()
            );
        }

        if !ended {
            match settings.missing_end_of_track {
                MissingEndOfTrackPolicy::Abort if !truncated => {
                    return Err(ReaderError::new(
                        content.buffer_position(),
                        ReaderErrorKind::chunk(ChunkError::MissingEndOfTrack),
                    ));
                }
                _ => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Track chunk has no end of track event");
                }
            }
        }

        Ok(TrackRead {
            chunk: Self { events },
            truncated,
        })
    }

    pub(crate) fn encode<S: ByteSink>(
        &self,
        sink: &mut S,
        settings: &WriteSettings,
    ) -> WriteResult<()> {
        let mut pass = WritePass::new(settings);
        for event in &self.events {
            if let Some(event) = pass.process(event) {
                encode_event(&event, sink, &mut pass.running_status, settings.use_running_status)?;
            }
        }
        let end = TrackEvent::new(pass.pending_delta, MetaMessage::EndOfTrack);
        encode_event(&end, sink, &mut pass.running_status, settings.use_running_status)
    }
}

impl FromIterator<TrackEvent> for TrackChunk {
    fn from_iter<T: IntoIterator<Item = TrackEvent>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// State of one chunk write: running status and the transforms of [`WriteSettings`]
struct WritePass<'s> {
    settings: &'s WriteSettings,
    running_status: RunningStatus,
    /// Delta of dropped events, added to the next written one
    pending_delta: u32,
    first_tempo: bool,
    first_key_signature: bool,
    first_time_signature: bool,
}

impl<'s> WritePass<'s> {
    fn new(settings: &'s WriteSettings) -> Self {
        Self {
            settings,
            running_status: RunningStatus::new(),
            pending_delta: 0,
            first_tempo: true,
            first_key_signature: true,
            first_time_signature: true,
        }
    }

    /// The event to write in place of `event`, or `None` to drop it
    fn process<'e>(&mut self, event: &'e TrackEvent) -> Option<Cow<'e, TrackEvent>> {
        if self.should_drop(event.message()) {
            self.pending_delta = self.pending_delta.saturating_add(event.delta_ticks());
            return None;
        }

        let mut event = Cow::Borrowed(event);
        if self.settings.note_off_as_silent_note_on {
            if let TrackMessage::ChannelVoice(voice) = event.message() {
                let rewritten = voice.note_off_to_silent_note_on();
                if rewritten != *voice {
                    *event.to_mut().message_mut() = rewritten.into();
                }
            }
        }
        if self.pending_delta > 0 {
            let delta = event
                .delta_ticks()
                .saturating_add(core::mem::take(&mut self.pending_delta));
            event.to_mut().set_delta_ticks(delta);
        }
        Some(event)
    }

    fn should_drop(&mut self, message: &TrackMessage) -> bool {
        let TrackMessage::Meta(meta) = message else {
            return false;
        };
        match meta {
            MetaMessage::EndOfTrack => true,
            m if m.is_unknown() => self.settings.delete_unknown_meta_events,
            MetaMessage::Tempo(tempo) => {
                let first = core::mem::replace(&mut self.first_tempo, false);
                self.elide(first, self.settings.delete_default_set_tempo, *tempo == Tempo::DEFAULT)
            }
            MetaMessage::KeySignature(key) => {
                let first = core::mem::replace(&mut self.first_key_signature, false);
                self.elide(
                    first,
                    self.settings.delete_default_key_signature,
                    *key == KeySignature::DEFAULT,
                )
            }
            MetaMessage::TimeSignature(sig) => {
                let first = core::mem::replace(&mut self.first_time_signature, false);
                self.elide(
                    first,
                    self.settings.delete_default_time_signature,
                    *sig == TimeSignature::DEFAULT,
                )
            }
            _ => false,
        }
    }

    fn elide(&self, first: bool, enabled: bool, is_default: bool) -> bool {
        let elide = first && enabled && is_default;
        if elide {
            #[cfg(feature = "tracing")]
            tracing::trace!("Eliding default valued meta event");
        }
        elide
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Channel, message::channel::ChannelVoiceMessage};
    use alloc::vec;
    use pretty_assertions::assert_eq;

    fn note_on(delta: u32, note: u8) -> TrackEvent {
        TrackEvent::new(delta, ChannelVoiceMessage::note_on(Channel::One, note, 100))
    }

    fn time_signature(delta: u32, numerator: u8) -> TrackEvent {
        TrackEvent::new(
            delta,
            MetaMessage::TimeSignature(TimeSignature::new(numerator, 4).unwrap()),
        )
    }

    #[test]
    fn end_of_track_is_appended() {
        let chunk = TrackChunk::new(vec![note_on(0, 60)]);
        assert_eq!(
            chunk.write_content(&WriteSettings::default()).unwrap(),
            [0x00, 0x90, 60, 100, 0x00, 0xFF, 0x2F, 0x00]
        );
        assert_eq!(TrackChunk::default().content_len(&WriteSettings::default()).unwrap(), 4);
    }

    #[test]
    fn stored_end_of_track_moves_to_the_end() {
        let chunk = TrackChunk::new(vec![
            note_on(0, 60),
            TrackEvent::new(10, MetaMessage::EndOfTrack),
            note_on(5, 62),
        ]);
        let bytes = chunk.write_content(&WriteSettings::default()).unwrap();
        let read = TrackChunk::read_content(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(read.events(), [note_on(0, 60), note_on(15, 62)]);
    }

    #[test]
    fn reading_stops_at_end_of_track() {
        let bytes = [0x00, 0x90, 60, 100, 0x00, 0xFF, 0x2F, 0x00, 0x00, 0x90, 61, 100];
        let read = TrackChunk::read_content(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(read.events(), [note_on(0, 60)]);
    }

    #[test]
    fn missing_end_of_track_policy() {
        let bytes = [0x00, 0x90, 60, 100];
        let tolerant = TrackChunk::read_content(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(tolerant.events(), [note_on(0, 60)]);

        let strict =
            ReadSettings::default().with_missing_end_of_track(MissingEndOfTrackPolicy::Abort);
        let err = TrackChunk::read_content(&bytes, &strict).unwrap_err();
        assert_eq!(
            err.error_kind(),
            &ReaderErrorKind::chunk(ChunkError::MissingEndOfTrack)
        );
    }

    #[test]
    fn event_overrunning_the_chunk() {
        let bytes = [0x00, 0x90, 60];
        let err = TrackChunk::read_content(&bytes, &ReadSettings::default()).unwrap_err();
        assert_eq!(
            err.error_kind(),
            &ReaderErrorKind::chunk(ChunkError::InvalidChunkSize {
                id: ChunkId::TRACK,
                expected: 3,
                actual: 4,
            })
        );
    }

    #[test]
    fn undefined_status_keeps_its_delta() {
        let bytes = [0x10, 0xF4, 0x05, 0x90, 60, 100, 0x00, 0xFF, 0x2F, 0x00];
        let read = TrackChunk::read_content(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(read.events(), [note_on(0x15, 60)]);
    }

    #[test]
    fn default_time_signature_is_elided() {
        let settings = WriteSettings::default().with_delete_default_time_signature(true);
        let chunk = TrackChunk::new(vec![time_signature(0, 4), note_on(10, 60)]);
        let bytes = chunk.write_content(&settings).unwrap();
        let read = TrackChunk::read_content(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(read.events(), [note_on(10, 60)]);
    }

    #[test]
    fn only_the_first_time_signature_may_be_elided() {
        let settings = WriteSettings::default().with_delete_default_time_signature(true);
        let chunk = TrackChunk::new(vec![
            time_signature(0, 3),
            note_on(10, 60),
            time_signature(20, 4),
        ]);
        let bytes = chunk.write_content(&settings).unwrap();
        let read = TrackChunk::read_content(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(read, chunk);

        let twice_default = TrackChunk::new(vec![time_signature(0, 4), time_signature(20, 4)]);
        let bytes = twice_default.write_content(&settings).unwrap();
        let read = TrackChunk::read_content(&bytes, &ReadSettings::default()).unwrap();
        assert_eq!(read.events(), [time_signature(20, 4)]);
    }

    #[test]
    fn note_off_rewrite_is_stable() {
        let settings = WriteSettings::default().with_note_off_as_silent_note_on(true);
        let read_settings = ReadSettings::default()
            .with_silent_note_on(crate::settings::SilentNoteOnPolicy::NoteOn);
        let chunk = TrackChunk::new(vec![
            note_on(0, 60),
            TrackEvent::new(96, ChannelVoiceMessage::note_off(Channel::One, 60, 64)),
        ]);
        let written = chunk.write_content(&settings).unwrap();
        let once = TrackChunk::read_content(&written, &read_settings).unwrap();
        assert_eq!(
            once.events()[1],
            TrackEvent::new(96, ChannelVoiceMessage::note_on(Channel::One, 60, 0))
        );
        let rewritten = once.write_content(&settings).unwrap();
        let twice = TrackChunk::read_content(&rewritten, &read_settings).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn ticked_events_accumulate() {
        let chunk = TrackChunk::new(vec![note_on(5, 60), note_on(0, 61), note_on(10, 62)]);
        let ticks: Vec<u64> = chunk.ticked_events().map(|t| t.ticks()).collect();
        assert_eq!(ticks, [5, 5, 15]);
    }
}
