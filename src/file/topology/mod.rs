#![doc = r#"
Converters that reshape the track chunks of a file

Each converter is a pure function from chunks to chunks, and returns its input
unchanged when it does not apply:

| Converter         | Applies when              | Result                                   |
|-------------------|---------------------------|------------------------------------------|
| [`SingleTrack`]   | two or more track chunks  | one track chunk ordered by absolute tick |
| [`MultiTrack`]    | exactly one track chunk   | one track chunk per channel in use       |
| [`MultiSequence`] | one or more track chunks  | one track chunk per sequence number      |

Converted outputs list the track chunks first and then every other chunk in
its original order.
"#]

mod multi_sequence;
pub use multi_sequence::*;

mod multi_track;
pub use multi_track::*;

mod single_track;
pub use single_track::*;

use alloc::vec::Vec;

use super::chunk::{MidiChunk, TrackChunk};
use crate::message::{Ticked, TrackEvent};

/// Reshapes a set of chunks
pub trait ChunksConverter {
    /// Convert `chunks`, cloning what is kept
    fn convert(&self, chunks: &[MidiChunk]) -> Vec<MidiChunk>;
}

fn track_chunks(chunks: &[MidiChunk]) -> impl Iterator<Item = &TrackChunk> {
    chunks.iter().filter_map(MidiChunk::as_track)
}

fn track_count(chunks: &[MidiChunk]) -> usize {
    track_chunks(chunks).count()
}

/// `tracks` followed by the non-track chunks of `chunks`
fn assemble(tracks: Vec<TrackChunk>, chunks: &[MidiChunk]) -> Vec<MidiChunk> {
    let mut out: Vec<MidiChunk> = tracks.into_iter().map(MidiChunk::Track).collect();
    out.extend(chunks.iter().filter(|c| !c.is_track()).cloned());
    out
}

/// Merge chunks into one by absolute tick.
///
/// At equal ticks meta events come before the rest. The sort is stable, so
/// events otherwise keep their order within a chunk, and earlier chunks go first.
fn merge<'a>(tracks: impl IntoIterator<Item = &'a TrackChunk>) -> Option<TrackChunk> {
    let mut ticked: Vec<Ticked<&TrackEvent>> = tracks
        .into_iter()
        .flat_map(TrackChunk::ticked_events)
        .collect();
    if ticked.is_empty() {
        return None;
    }
    ticked.sort_by_key(|t| (t.ticks(), !t.event().message().is_meta()));
    Some(with_deltas(
        ticked
            .into_iter()
            .map(|t| Ticked::new(t.ticks(), TrackEvent::clone(t.event()))),
    ))
}

/// Build a chunk from events at non-decreasing absolute ticks
fn with_deltas(events: impl IntoIterator<Item = Ticked<TrackEvent>>) -> TrackChunk {
    let mut previous = 0;
    events
        .into_iter()
        .map(|ticked| {
            let delta = ticked.ticks() - previous;
            previous = ticked.ticks();
            ticked
                .into_event()
                .with_delta_ticks(u32::try_from(delta).unwrap_or(u32::MAX))
        })
        .collect()
}
