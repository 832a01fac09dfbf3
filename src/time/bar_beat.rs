use core::fmt;

use super::{ConversionError, ConversionResult, TimeSpan, end_tick};
use crate::{message::meta::TimeSignature, tempo::TempoMap};

#[doc = r#"
A length in bars, beats and ticks.

Bars are counted from the start of the length under the time signature in
effect at each point. A time signature change always starts a new bar, so a
bar cut short by a change still counts as one. Whatever remains after the last
whole bar is split into beats of the time signature in effect there, and ticks.

```rust
use smfkit::prelude::*;

let mut map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
map.set_time_signature(768, TimeSignature::new(3, 4).unwrap());

// two bars of 4/4, one bar of 3/4, then a beat and a half
let position: BarBeatTime = time::to_time(768 + 288 + 144, &map).unwrap();
assert_eq!(position, BarBeatTime::new(3, 1, 48));
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarBeatTime {
    bars: u64,
    beats: u64,
    ticks: u64,
}

impl BarBeatTime {
    /// Create a bar/beat/tick triple
    pub const fn new(bars: u64, beats: u64, ticks: u64) -> Self {
        Self { bars, beats, ticks }
    }
    /// Whole bars
    pub const fn bars(&self) -> u64 {
        self.bars
    }
    /// Whole beats after the bars
    pub const fn beats(&self) -> u64 {
        self.beats
    }
    /// Ticks after the beats
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Bar and beat lengths of `signature`, rejecting beats that are not a whole
/// positive number of ticks
fn lengths(signature: TimeSignature, ticks_per_quarter_note: u16) -> ConversionResult<(u64, u64)> {
    let whole_note = 4 * u64::from(ticks_per_quarter_note);
    let beat = signature.beat_length(ticks_per_quarter_note);
    let bar = signature.bar_length(ticks_per_quarter_note);
    if beat == 0 || bar == 0 || whole_note % u64::from(signature.denominator()) != 0 {
        return Err(ConversionError::InvalidTimeSignature {
            numerator: signature.numerator(),
            denominator: signature.denominator(),
        });
    }
    Ok((bar, beat))
}

/// The first time signature change after `ticks`
fn next_change(map: &TempoMap, ticks: u64) -> Option<u64> {
    let changes = map.time_signature_changes();
    let index = changes.partition_point(|c| c.ticks() <= ticks);
    changes.get(index).map(|c| c.ticks())
}

impl TimeSpan for BarBeatTime {
    fn from_ticks(length: u64, start: u64, map: &TempoMap) -> ConversionResult<Self> {
        let tpqn = map.ticks_per_quarter_note()?;
        let end = end_tick(start, length)?;
        let mut position = start;
        let mut bars = 0u64;

        loop {
            let (bar, _) = lengths(map.time_signature_at(position), tpqn)?;
            match next_change(map, position) {
                Some(change) if change < end => {
                    let whole = (change - position) / bar;
                    bars += whole;
                    position += whole * bar;
                    if position < change {
                        bars += 1;
                        position = change;
                    }
                }
                _ => {
                    let whole = (end - position) / bar;
                    bars += whole;
                    position += whole * bar;
                    break;
                }
            }
        }

        let (_, beat) = lengths(map.time_signature_at(position), tpqn)?;
        let remainder = end - position;
        Ok(Self {
            bars,
            beats: remainder / beat,
            ticks: remainder % beat,
        })
    }

    fn to_ticks(&self, start: u64, map: &TempoMap) -> ConversionResult<u64> {
        let tpqn = map.ticks_per_quarter_note()?;
        let mut position = start;
        let mut bars = self.bars;

        while bars > 0 {
            let (bar, _) = lengths(map.time_signature_at(position), tpqn)?;
            match next_change(map, position) {
                Some(change) if (change - position) / bar < bars => {
                    let whole = (change - position) / bar;
                    bars -= whole;
                    position += whole * bar;
                    if position < change {
                        bars -= 1;
                        position = change;
                    }
                }
                _ => {
                    let span = bars.checked_mul(bar).ok_or(ConversionError::Overflow)?;
                    position = end_tick(position, span)?;
                    bars = 0;
                }
            }
        }

        let (_, beat) = lengths(map.time_signature_at(position), tpqn)?;
        let beats = self
            .beats
            .checked_mul(beat)
            .and_then(|ticks| ticks.checked_add(self.ticks))
            .ok_or(ConversionError::Overflow)?;
        Ok(end_tick(position, beats)? - start)
    }
}

impl fmt::Display for BarBeatTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.bars, self.beats, self.ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{file::timing::Timing, time};
    use alloc::format;
    use pretty_assertions::assert_eq;

    fn map() -> TempoMap {
        TempoMap::new(Timing::new_ticks_per_quarter_note(96))
    }

    #[test]
    fn common_time() {
        let map = map();
        assert_eq!(
            time::to_time::<BarBeatTime>(384 * 2 + 96 + 10, &map),
            Ok(BarBeatTime::new(2, 1, 10))
        );
        assert_eq!(
            time::from_time(&BarBeatTime::new(2, 1, 10), &map),
            Ok(384 * 2 + 96 + 10)
        );
    }

    #[test]
    fn six_eight_beats_are_eighths() {
        let mut map = map();
        map.set_time_signature(0, TimeSignature::new(6, 8).unwrap());
        assert_eq!(
            time::to_time::<BarBeatTime>(288 + 48 * 5 + 1, &map),
            Ok(BarBeatTime::new(1, 5, 1))
        );
    }

    #[test]
    fn change_inside_a_bar_starts_a_new_one() {
        let mut map = map();
        map.set_time_signature(200, TimeSignature::new(3, 4).unwrap());
        // 0..200 is a short bar of 4/4, 3/4 starts at 200
        assert_eq!(
            time::to_time::<BarBeatTime>(200 + 288 + 96, &map),
            Ok(BarBeatTime::new(2, 1, 0))
        );
        assert_eq!(
            time::from_time(&BarBeatTime::new(2, 1, 0), &map),
            Ok(200 + 288 + 96)
        );
        assert_eq!(
            time::to_time::<BarBeatTime>(150, &map),
            Ok(BarBeatTime::new(0, 1, 54))
        );
    }

    #[test]
    fn round_trips_across_changes() {
        let mut map = map();
        map.set_time_signature(0, TimeSignature::new(5, 4).unwrap());
        map.set_time_signature(1000, TimeSignature::new(7, 8).unwrap());
        map.set_time_signature(2000, TimeSignature::new(2, 2).unwrap());
        for ticks in (0..4000).step_by(7) {
            let bbt: BarBeatTime = time::to_time(ticks, &map).unwrap();
            assert_eq!(time::from_time(&bbt, &map), Ok(ticks), "tick {ticks} as {bbt}");
        }
    }

    #[test]
    fn lengths_are_measured_from_their_start() {
        let mut map = map();
        map.set_time_signature(384, TimeSignature::new(3, 4).unwrap());
        let length: BarBeatTime = time::to_length(384, 192, &map).unwrap();
        // half a bar of 4/4 up to the change, then 192 ticks of 3/4
        assert_eq!(length, BarBeatTime::new(1, 2, 0));
        assert_eq!(time::from_length(&length, 192, &map), Ok(384));
    }

    #[test]
    fn beat_shorter_than_a_tick() {
        let mut map = TempoMap::new(Timing::new_ticks_per_quarter_note(1));
        map.set_time_signature(0, TimeSignature::new(4, 8).unwrap());
        assert_eq!(
            time::to_time::<BarBeatTime>(10, &map),
            Err(ConversionError::InvalidTimeSignature {
                numerator: 4,
                denominator: 8
            })
        );
    }

    #[test]
    fn beat_with_a_partial_tick() {
        let mut map = TempoMap::new(Timing::new_ticks_per_quarter_note(100));
        // 400 / 64 is 6.25 ticks
        map.set_time_signature(0, TimeSignature::new(3, 64).unwrap());
        assert_eq!(
            time::to_time::<BarBeatTime>(100, &map),
            Err(ConversionError::InvalidTimeSignature {
                numerator: 3,
                denominator: 64
            })
        );
        assert_eq!(
            time::from_time(&BarBeatTime::new(1, 0, 0), &map),
            Err(ConversionError::InvalidTimeSignature {
                numerator: 3,
                denominator: 64
            })
        );
        // 400 / 16 divides evenly
        map.set_time_signature(0, TimeSignature::new(3, 16).unwrap());
        assert_eq!(
            time::to_time::<BarBeatTime>(100, &map),
            Ok(BarBeatTime::new(1, 1, 0))
        );
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", BarBeatTime::new(3, 2, 15)), "3.2.15");
    }
}
