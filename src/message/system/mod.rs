#![doc = r#"
System exclusive, system common and system real-time messages.

Inside a file, system exclusive data is length prefixed:

```text
F0 <varlen size> <bytes, normally ending in F7>
F7 <varlen size> <bytes>
```

The first form is a complete (or first) packet; the second is an escape that
carries arbitrary bytes, such as sysex continuations or real-time messages.
"#]

use alloc::vec::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{DataByte, writer::ByteSink};

/// A system exclusive packet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemExclusiveMessage {
    /// `F0`. The bytes are kept as written, including the closing `F7`.
    Normal(Vec<u8>),
    /// `F7`. Raw bytes with no framing of their own.
    Escape(Vec<u8>),
}

impl SystemExclusiveMessage {
    /// The status byte
    pub const fn status(&self) -> u8 {
        match self {
            Self::Normal(_) => 0xF0,
            Self::Escape(_) => 0xF7,
        }
    }
    /// The bytes after the length
    pub fn data(&self) -> &[u8] {
        match self {
            Self::Normal(data) | Self::Escape(data) => data,
        }
    }
    /// True if this is a normal packet ending with `F7`
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Normal(data) if data.last() == Some(&0xF7))
    }
}

/// Status bytes of the system common messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub(crate) enum SystemCommonStatus {
    MtcQuarterFrame = 0xF1,
    SongPositionPointer = 0xF2,
    SongSelect = 0xF3,
    TuneRequest = 0xF6,
}

impl SystemCommonStatus {
    pub(crate) const fn param_count(&self) -> usize {
        match self {
            Self::MtcQuarterFrame | Self::SongSelect => 1,
            Self::SongPositionPointer => 2,
            Self::TuneRequest => 0,
        }
    }

    pub(crate) const fn with_params(
        &self,
        first: DataByte,
        second: DataByte,
    ) -> SystemCommonMessage {
        match self {
            Self::MtcQuarterFrame => SystemCommonMessage::MtcQuarterFrame(first),
            Self::SongPositionPointer => SystemCommonMessage::SongPositionPointer {
                lsb: first,
                msb: second,
            },
            Self::SongSelect => SystemCommonMessage::SongSelect(first),
            Self::TuneRequest => SystemCommonMessage::TuneRequest,
        }
    }
}

/// A system common message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemCommonMessage {
    /// `F1`, one MIDI time code piece
    MtcQuarterFrame(DataByte),
    /// `F2`, a fourteen bit count of sixteenth notes since the song start
    SongPositionPointer {
        /// Low seven bits
        lsb: DataByte,
        /// High seven bits
        msb: DataByte,
    },
    /// `F3`
    SongSelect(DataByte),
    /// `F6`
    TuneRequest,
}

impl SystemCommonMessage {
    /// The status byte
    pub const fn status(&self) -> u8 {
        match self {
            Self::MtcQuarterFrame(_) => 0xF1,
            Self::SongPositionPointer { .. } => 0xF2,
            Self::SongSelect(_) => 0xF3,
            Self::TuneRequest => 0xF6,
        }
    }

    pub(crate) fn write<S: ByteSink>(&self, sink: &mut S) {
        sink.put(self.status());
        match self {
            Self::MtcQuarterFrame(b) | Self::SongSelect(b) => sink.put(b.value()),
            Self::SongPositionPointer { lsb, msb } => sink.put_slice(&[lsb.value(), msb.value()]),
            Self::TuneRequest => {}
        }
    }
}

/// A system real-time message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum SystemRealTimeMessage {
    TimingClock = 0xF8,
    Start = 0xFA,
    Continue = 0xFB,
    Stop = 0xFC,
    ActiveSensing = 0xFE,
}

impl SystemRealTimeMessage {
    /// The status byte
    pub fn status(&self) -> u8 {
        (*self).into()
    }
}

#[test]
fn common_param_counts() {
    use pretty_assertions::assert_eq;
    let status = SystemCommonStatus::try_from(0xF2).unwrap();
    assert_eq!(status.param_count(), 2);
    assert!(SystemCommonStatus::try_from(0xF4).is_err());
    assert!(SystemRealTimeMessage::try_from(0xF9).is_err());
    assert_eq!(SystemRealTimeMessage::Stop.status(), 0xFC);
}
