#![doc = r#"
The tempo and time signature schedule of a file

A [`TempoMap`] holds the file's [`Timing`] plus two breakpoint lists: tempo
changes and time signature changes, each keyed by absolute tick. Before the
first breakpoint (and everywhere, for an empty list) the defaults apply:
500 000 µs per quarter note and 4/4.

The map is a snapshot. It is built once from the events of a file, or
assembled by hand with [`TempoMap::set_tempo`] and
[`TempoMap::set_time_signature`], and is only read by the
[`time`](crate::time) conversions.

```rust
use smfkit::prelude::*;

let mut map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
map.set_tempo(480, Tempo::new(250_000));

assert_eq!(map.tempo_at(479), Tempo::DEFAULT);
assert_eq!(map.tempo_at(480).micros_per_quarter_note(), 250_000);
```
"#]

mod line;
pub(crate) use line::ValueLine;

use crate::{
    file::{chunk::MidiChunk, timing::Timing},
    message::{
        Ticked, TrackEvent, TrackMessage,
        meta::{MetaMessage, Tempo, TimeSignature},
    },
    time::{ConversionError, ConversionResult},
};

/// Tempo and time signature changes over absolute ticks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempoMap {
    timing: Timing,
    tempo: ValueLine<Tempo>,
    time_signature: ValueLine<TimeSignature>,
}

impl TempoMap {
    /// A map with no changes
    pub const fn new(timing: Timing) -> Self {
        Self {
            timing,
            tempo: ValueLine::new(Tempo::DEFAULT),
            time_signature: ValueLine::new(TimeSignature::DEFAULT),
        }
    }

    /// Collect the tempo and time signature events of every track chunk.
    ///
    /// Where chunks disagree at a tick, the later chunk wins.
    pub fn from_chunks(timing: Timing, chunks: &[MidiChunk]) -> Self {
        let mut map = Self::new(timing);
        for track in chunks.iter().filter_map(MidiChunk::as_track) {
            map.extend(track.ticked_events());
        }
        map
    }

    /// Collect the tempo and time signature events of one delta-timed sequence
    pub fn from_events<'a>(
        timing: Timing,
        events: impl IntoIterator<Item = &'a TrackEvent>,
    ) -> Self {
        let mut map = Self::new(timing);
        let ticked = events.into_iter().scan(0u64, |ticks, event| {
            *ticks += u64::from(event.delta_ticks());
            Some(Ticked::new(*ticks, event))
        });
        map.extend(ticked);
        map
    }

    fn extend<'a>(&mut self, events: impl IntoIterator<Item = Ticked<&'a TrackEvent>>) {
        for ticked in events {
            match ticked.event().message() {
                TrackMessage::Meta(MetaMessage::Tempo(tempo)) => {
                    self.tempo.set(ticked.ticks(), *tempo);
                }
                TrackMessage::Meta(MetaMessage::TimeSignature(sig)) => {
                    self.time_signature.set(ticked.ticks(), *sig);
                }
                _ => {}
            }
        }
    }

    /// Change the tempo from `ticks` on
    pub fn set_tempo(&mut self, ticks: u64, tempo: Tempo) {
        self.tempo.set(ticks, tempo);
    }
    /// Change the time signature from `ticks` on
    pub fn set_time_signature(&mut self, ticks: u64, time_signature: TimeSignature) {
        self.time_signature.set(ticks, time_signature);
    }

    /// The tempo in effect at `ticks`
    pub fn tempo_at(&self, ticks: u64) -> Tempo {
        self.tempo.value_at(ticks)
    }
    /// The time signature in effect at `ticks`
    pub fn time_signature_at(&self, ticks: u64) -> TimeSignature {
        self.time_signature.value_at(ticks)
    }

    /// Tempo breakpoints, sorted by tick
    pub fn tempo_changes(&self) -> &[Ticked<Tempo>] {
        self.tempo.changes()
    }
    /// Time signature breakpoints, sorted by tick
    pub fn time_signature_changes(&self) -> &[Ticked<TimeSignature>] {
        self.time_signature.changes()
    }

    /// The timing of the file
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Ticks per quarter note, or an error for SMPTE timing or a zero division
    pub fn ticks_per_quarter_note(&self) -> ConversionResult<u16> {
        self.timing
            .ticks_per_quarter_note()
            .filter(|&tpqn| tpqn > 0)
            .ok_or(ConversionError::UnsupportedTimeDivision)
    }

    /// `(start tick, tempo)` runs, the first starting at tick 0
    pub(crate) fn tempo_segments(&self) -> impl Iterator<Item = (u64, Tempo)> + '_ {
        self.tempo.segments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Channel,
        file::{chunk::TrackChunk, timing::SmpteFps},
        message::channel::ChannelVoiceMessage,
    };
    use alloc::vec;
    use pretty_assertions::assert_eq;

    fn tempo(delta: u32, micros: u32) -> TrackEvent {
        TrackEvent::new(delta, MetaMessage::Tempo(Tempo::new(micros)))
    }

    #[test]
    fn scans_every_track() {
        let conductor = TrackChunk::new(vec![
            tempo(0, 600_000),
            TrackEvent::new(
                96,
                MetaMessage::TimeSignature(TimeSignature::new(3, 4).unwrap()),
            ),
        ]);
        let notes = TrackChunk::new(vec![
            TrackEvent::new(10, ChannelVoiceMessage::note_on(Channel::One, 60, 1)),
            tempo(86, 300_000),
        ]);
        let map = TempoMap::from_chunks(
            Timing::new_ticks_per_quarter_note(96),
            &[conductor.into(), notes.into()],
        );
        assert_eq!(
            map.tempo_changes(),
            [
                Ticked::new(0, Tempo::new(600_000)),
                Ticked::new(96, Tempo::new(300_000))
            ]
        );
        assert_eq!(map.time_signature_at(95), TimeSignature::DEFAULT);
        assert_eq!(map.time_signature_at(96).numerator(), 3);
    }

    #[test]
    fn same_tick_keeps_the_last() {
        let events = [tempo(0, 400_000), tempo(0, 450_000)];
        let map = TempoMap::from_events(Timing::default(), &events);
        assert_eq!(
            map.tempo_changes(),
            [Ticked::new(0, Tempo::new(450_000))]
        );
    }

    #[test]
    fn smpte_has_no_quarter_note() {
        let map = TempoMap::new(Timing::new_smpte(SmpteFps::TwentyFive, 40));
        assert_eq!(
            map.ticks_per_quarter_note(),
            Err(ConversionError::UnsupportedTimeDivision)
        );
    }
}
