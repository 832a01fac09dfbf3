#![doc = r#"
Reading, writing and reshaping Standard MIDI Files, plus tempo-aware time math.

# Overview

`smfkit` decodes a file into [`MidiChunk`](crate::prelude::MidiChunk)s holding
[`TrackEvent`](crate::prelude::TrackEvent)s, writes them back byte-exact (optionally
compressed), reshapes the chunk set between the three file formats, and converts
tick positions and spans into wall-clock, musical and bar/beat units with a
[`TempoMap`](crate::prelude::TempoMap).

```rust
use smfkit::prelude::*;

let mut track = TrackChunk::default();
track.push(TrackEvent::new(0, ChannelVoiceMessage::note_on(Channel::One, 60, 100)));
track.push(TrackEvent::new(96, ChannelVoiceMessage::note_off(Channel::One, 60, 0)));

let file = MidiFile::new(Timing::new_ticks_per_quarter_note(96), vec![track.into()]);
let bytes = file.write(FormatType::SingleMultiChannel, &WriteSettings::default()).unwrap();

let parsed = MidiFile::parse(&bytes, &ReadSettings::default()).unwrap();
assert_eq!(parsed.track_chunks().count(), 1);

let map = parsed.tempo_map();
let end = time::to_time::<MetricTime>(96, &map).unwrap();
assert_eq!(end.as_millis(), 500);
```

# Features

- `std` (default): use the standard library. Without it the crate is `no_std + alloc`.
- `serde`: (de)serialization of settings and value types.
- `tracing`: emit diagnostics for tolerated read problems and write-side elisions.
"#]
#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod byte;
pub use byte::*;

mod error;
pub use error::*;

pub mod codec;
pub mod file;
pub mod message;
pub mod reader;
pub mod settings;
pub mod tempo;
pub mod time;
pub(crate) mod writer;

pub mod prelude;
