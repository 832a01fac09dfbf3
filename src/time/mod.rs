#![doc = r#"
Conversions between ticks and human time units

Positions and spans in a file are counted in ticks. The types here express them
in other units, using a [`TempoMap`] for everything that depends on tempo or
time signature:

| Type             | Unit                                  | Depends on       |
|------------------|---------------------------------------|------------------|
| [`MidiTime`]     | ticks                                 | nothing          |
| [`MetricTime`]   | microseconds                          | tempo changes    |
| [`MusicalTime`]  | fraction of a whole note              | ticks per quarter |
| [`BarBeatTime`]  | bars, beats and ticks                 | time signatures  |

A *time* is a position measured from tick 0. A *length* is a span that starts
at some tick; since tempo and meter may change inside it, a length is only
meaningful together with its start.

```rust
use smfkit::prelude::*;

let mut map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
map.set_tempo(480, Tempo::new(250_000));

let at_change: MetricTime = time::to_time(480, &map).unwrap();
assert_eq!(at_change.as_micros(), 2_500_000);
assert_eq!(time::from_time(&at_change, &map), Ok(480));

// the span crosses the tempo change
let span: MetricTime = time::to_length(96, 470, &map).unwrap();
assert_eq!(span.as_micros(), 276_042);
```

Conversions that need ticks per quarter note fail with
[`ConversionError::UnsupportedTimeDivision`] for SMPTE timing.
"#]

mod bar_beat;
pub use bar_beat::*;

mod error;
pub use error::*;

mod metric;
pub use metric::*;

mod musical;
pub use musical::*;

mod ticks;
pub use ticks::*;

use crate::tempo::TempoMap;

/// A position or span that can be expressed in ticks
pub trait TimeSpan: Sized {
    /// The span of `length` ticks starting at tick `start`
    fn from_ticks(length: u64, start: u64, map: &TempoMap) -> ConversionResult<Self>;

    /// The number of ticks this span covers when it starts at tick `start`
    fn to_ticks(&self, start: u64, map: &TempoMap) -> ConversionResult<u64>;
}

/// Express the absolute tick position `ticks` as a `T`
pub fn to_time<T: TimeSpan>(ticks: u64, map: &TempoMap) -> ConversionResult<T> {
    T::from_ticks(ticks, 0, map)
}

/// The absolute tick position of `time`
pub fn from_time<T: TimeSpan>(time: &T, map: &TempoMap) -> ConversionResult<u64> {
    time.to_ticks(0, map)
}

/// Express `length` ticks starting at tick `start` as a `T`
pub fn to_length<T: TimeSpan>(length: u64, start: u64, map: &TempoMap) -> ConversionResult<T> {
    T::from_ticks(length, start, map)
}

/// The number of ticks `length` covers when it starts at tick `start`
pub fn from_length<T: TimeSpan>(length: &T, start: u64, map: &TempoMap) -> ConversionResult<u64> {
    length.to_ticks(start, map)
}

/// Re-express a length starting at `start` in another unit
pub fn convert<F: TimeSpan, T: TimeSpan>(
    length: &F,
    start: u64,
    map: &TempoMap,
) -> ConversionResult<T> {
    let ticks = length.to_ticks(start, map)?;
    T::from_ticks(ticks, start, map)
}

fn end_tick(start: u64, length: u64) -> ConversionResult<u64> {
    start.checked_add(length).ok_or(ConversionError::Overflow)
}
