#![doc = r#"
Meta events

Meta events never reach a synthesizer; they describe the sequence. Each is
framed as

```text
FF <type> <varlen size> <payload>
```

Types this crate understands are decoded into [`MetaMessage`] variants.
Other types go through the caller's [`CustomMetaRegistry`] and otherwise
stay as [`MetaMessage::Unknown`] with their raw payload.

When a payload is longer than its type needs, the extra bytes are skipped,
so files written by newer software still read.
"#]

mod custom;
pub use custom::*;

mod key_signature;
pub use key_signature::*;

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

mod time_signature;
pub use time_signature::*;

use alloc::vec::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    Channel, MetaError, ParseError,
    settings::{InvalidMetaValuePolicy, ReadSettings},
    writer::ByteSink,
};

/// The meta event types with a dedicated [`MetaMessage`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MetaType {
    SequenceNumber = 0x00,
    Text = 0x01,
    Copyright = 0x02,
    TrackName = 0x03,
    InstrumentName = 0x04,
    Lyric = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ProgramName = 0x08,
    DeviceName = 0x09,
    ChannelPrefix = 0x20,
    PortPrefix = 0x21,
    EndOfTrack = 0x2F,
    Tempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

/// A decoded meta event
#[derive(Debug, Clone, PartialEq)]
pub enum MetaMessage {
    /// `FF 00`. `None` when written with an empty payload.
    SequenceNumber(Option<u16>),
    /// `FF 01`
    Text(Vec<u8>),
    /// `FF 02`
    Copyright(Vec<u8>),
    /// `FF 03`
    TrackName(Vec<u8>),
    /// `FF 04`
    InstrumentName(Vec<u8>),
    /// `FF 05`
    Lyric(Vec<u8>),
    /// `FF 06`
    Marker(Vec<u8>),
    /// `FF 07`
    CuePoint(Vec<u8>),
    /// `FF 08`
    ProgramName(Vec<u8>),
    /// `FF 09`
    DeviceName(Vec<u8>),
    /// `FF 20`. Associates the following meta and sysex events with a channel.
    ChannelPrefix(Channel),
    /// `FF 21`
    PortPrefix(u8),
    /// `FF 2F`. Written automatically at the end of every track chunk.
    EndOfTrack,
    /// `FF 51`
    Tempo(Tempo),
    /// `FF 54`
    SmpteOffset(SmpteOffset),
    /// `FF 58`
    TimeSignature(TimeSignature),
    /// `FF 59`
    KeySignature(KeySignature),
    /// `FF 7F`
    SequencerSpecific(Vec<u8>),
    /// A type decoded through the [`CustomMetaRegistry`]
    Custom(CustomMeta),
    /// Any other type, kept verbatim
    Unknown {
        /// The type byte
        status: u8,
        /// The payload
        data: Vec<u8>,
    },
}

impl MetaMessage {
    /// A text event
    pub fn text(text: impl Into<Vec<u8>>) -> Self {
        Self::Text(text.into())
    }

    /// A track name
    pub fn track_name(name: impl Into<Vec<u8>>) -> Self {
        Self::TrackName(name.into())
    }

    /// The type byte written after `FF`
    pub fn status(&self) -> u8 {
        let kind = match self {
            Self::SequenceNumber(_) => MetaType::SequenceNumber,
            Self::Text(_) => MetaType::Text,
            Self::Copyright(_) => MetaType::Copyright,
            Self::TrackName(_) => MetaType::TrackName,
            Self::InstrumentName(_) => MetaType::InstrumentName,
            Self::Lyric(_) => MetaType::Lyric,
            Self::Marker(_) => MetaType::Marker,
            Self::CuePoint(_) => MetaType::CuePoint,
            Self::ProgramName(_) => MetaType::ProgramName,
            Self::DeviceName(_) => MetaType::DeviceName,
            Self::ChannelPrefix(_) => MetaType::ChannelPrefix,
            Self::PortPrefix(_) => MetaType::PortPrefix,
            Self::EndOfTrack => MetaType::EndOfTrack,
            Self::Tempo(_) => MetaType::Tempo,
            Self::SmpteOffset(_) => MetaType::SmpteOffset,
            Self::TimeSignature(_) => MetaType::TimeSignature,
            Self::KeySignature(_) => MetaType::KeySignature,
            Self::SequencerSpecific(_) => MetaType::SequencerSpecific,
            Self::Custom(c) => return c.status(),
            Self::Unknown { status, .. } => return *status,
        };
        kind.into()
    }

    /// The payload of the text family of events
    pub fn text_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(t)
            | Self::Copyright(t)
            | Self::TrackName(t)
            | Self::InstrumentName(t)
            | Self::Lyric(t)
            | Self::Marker(t)
            | Self::CuePoint(t)
            | Self::ProgramName(t)
            | Self::DeviceName(t) => Some(t.as_slice()),
            _ => None,
        }
    }

    /// The text payload, if it is valid UTF-8
    pub fn text_str(&self) -> Option<&str> {
        self.text_bytes()
            .and_then(|bytes| core::str::from_utf8(bytes).ok())
    }

    /// True for events kept verbatim because their type is not known
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }

    /// Decode the payload of a meta event of type `status`.
    ///
    /// Returns the message and the number of payload bytes it used.
    pub(crate) fn decode(
        status: u8,
        payload: &[u8],
        settings: &ReadSettings,
    ) -> Result<(Self, usize), ParseError> {
        let snap = settings.invalid_meta_value == InvalidMetaValuePolicy::SnapToLimits;
        let Ok(kind) = MetaType::try_from(status) else {
            if let Some(custom) = settings.custom_meta_types.decode(status, payload) {
                return Ok((Self::Custom(custom?), payload.len()));
            }
            return Ok((
                Self::Unknown {
                    status,
                    data: payload.to_vec(),
                },
                payload.len(),
            ));
        };
        let text = || payload.to_vec();
        let message = match kind {
            MetaType::SequenceNumber => {
                if payload.is_empty() {
                    return Ok((Self::SequenceNumber(None), 0));
                }
                let [a, b] = fixed::<2>("Sequence Number", payload)?;
                return Ok((Self::SequenceNumber(Some(u16::from_be_bytes([a, b]))), 2));
            }
            MetaType::Text => Self::Text(text()),
            MetaType::Copyright => Self::Copyright(text()),
            MetaType::TrackName => Self::TrackName(text()),
            MetaType::InstrumentName => Self::InstrumentName(text()),
            MetaType::Lyric => Self::Lyric(text()),
            MetaType::Marker => Self::Marker(text()),
            MetaType::CuePoint => Self::CuePoint(text()),
            MetaType::ProgramName => Self::ProgramName(text()),
            MetaType::DeviceName => Self::DeviceName(text()),
            MetaType::SequencerSpecific => Self::SequencerSpecific(text()),
            MetaType::ChannelPrefix => {
                let [index] = fixed::<1>("Channel Prefix", payload)?;
                let channel = match Channel::from_index(index) {
                    Some(channel) => channel,
                    None if snap => Channel::Sixteen,
                    None => return Err(MetaError::ChannelPrefix(index).into()),
                };
                return Ok((Self::ChannelPrefix(channel), 1));
            }
            MetaType::PortPrefix => {
                let [port] = fixed::<1>("Port Prefix", payload)?;
                return Ok((Self::PortPrefix(port), 1));
            }
            MetaType::EndOfTrack => return Ok((Self::EndOfTrack, 0)),
            MetaType::Tempo => {
                let micros = Tempo::from_be_bytes(fixed::<3>("Set Tempo", payload)?);
                if micros == 0 {
                    return Err(MetaError::ZeroTempo.into());
                }
                return Ok((Self::Tempo(Tempo::new(micros)), 3));
            }
            MetaType::SmpteOffset => {
                let bytes = fixed::<5>("SMPTE Offset", payload)?;
                let offset = if snap {
                    SmpteOffset::parse_clamped(&bytes)?
                } else {
                    SmpteOffset::parse(&bytes)?
                };
                return Ok((Self::SmpteOffset(offset), 5));
            }
            MetaType::TimeSignature => {
                let sig = TimeSignature::from_bytes(fixed::<4>("Time Signature", payload)?)?;
                return Ok((Self::TimeSignature(sig), 4));
            }
            MetaType::KeySignature => {
                let bytes = fixed::<2>("Key Signature", payload)?;
                let key = if snap {
                    KeySignature::from_bytes_clamped(bytes)
                } else {
                    KeySignature::from_bytes(bytes)?
                };
                return Ok((Self::KeySignature(key), 2));
            }
        };
        Ok((message, payload.len()))
    }

    /// Write the payload, without type byte or length
    pub(crate) fn write_payload<S: ByteSink>(&self, sink: &mut S) {
        match self {
            Self::SequenceNumber(None) | Self::EndOfTrack => {}
            Self::SequenceNumber(Some(number)) => sink.put_u16(*number),
            Self::Text(t)
            | Self::Copyright(t)
            | Self::TrackName(t)
            | Self::InstrumentName(t)
            | Self::Lyric(t)
            | Self::Marker(t)
            | Self::CuePoint(t)
            | Self::ProgramName(t)
            | Self::DeviceName(t)
            | Self::SequencerSpecific(t)
            | Self::Unknown { data: t, .. } => sink.put_slice(t),
            Self::ChannelPrefix(channel) => sink.put(channel.index()),
            Self::PortPrefix(port) => sink.put(*port),
            Self::Tempo(tempo) => sink.put_slice(&tempo.to_be_bytes()),
            Self::SmpteOffset(offset) => sink.put_slice(&offset.to_bytes()),
            Self::TimeSignature(sig) => sink.put_slice(&sig.to_bytes()),
            Self::KeySignature(key) => sink.put_slice(&key.to_bytes()),
            Self::Custom(custom) => sink.put_slice(&custom.payload()),
        }
    }
}

/// The first `N` bytes of a payload
fn fixed<const N: usize>(kind: &'static str, payload: &[u8]) -> Result<[u8; N], MetaError> {
    payload
        .get(..N)
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or(MetaError::Length {
            kind,
            expected: N,
            actual: payload.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(status: u8, payload: &[u8]) -> Result<(MetaMessage, usize), ParseError> {
        MetaMessage::decode(status, payload, &ReadSettings::default())
    }

    fn decode_snapped(status: u8, payload: &[u8]) -> MetaMessage {
        let settings =
            ReadSettings::default().with_invalid_meta_value(InvalidMetaValuePolicy::SnapToLimits);
        MetaMessage::decode(status, payload, &settings).unwrap().0
    }

    #[test]
    fn oversized_payload_is_partially_used() {
        let (msg, used) = decode(0x51, &[0x07, 0xA1, 0x20, 0xAA, 0xBB]).unwrap();
        assert_eq!(msg, MetaMessage::Tempo(Tempo::DEFAULT));
        assert_eq!(used, 3);
    }

    #[test]
    fn short_payload_is_an_error() {
        assert_eq!(
            decode(0x58, &[4, 2]).unwrap_err(),
            ParseError::Meta(MetaError::Length {
                kind: "Time Signature",
                expected: 4,
                actual: 2
            })
        );
        assert_eq!(
            decode(0x51, &[0, 0, 0]).unwrap_err(),
            ParseError::Meta(MetaError::ZeroTempo)
        );
    }

    #[test]
    fn empty_sequence_number() {
        assert_eq!(decode(0x00, &[]).unwrap(), (MetaMessage::SequenceNumber(None), 0));
        assert_eq!(
            decode(0x00, &[0x01, 0x02]).unwrap(),
            (MetaMessage::SequenceNumber(Some(0x0102)), 2)
        );
    }

    #[test]
    fn unknown_type_keeps_bytes() {
        let (msg, _) = decode(0x60, &[1, 2, 3]).unwrap();
        assert!(msg.is_unknown());
        assert_eq!(msg.status(), 0x60);
        let mut out = Vec::new();
        msg.write_payload(&mut out);
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn channel_prefix_range() {
        assert_eq!(
            decode(0x20, &[16]).unwrap_err(),
            ParseError::Meta(MetaError::ChannelPrefix(16))
        );
        assert_eq!(
            decode(0x20, &[9]).unwrap().0,
            MetaMessage::ChannelPrefix(Channel::Ten)
        );
    }

    #[test]
    fn out_of_range_values_snap_to_limits() {
        assert_eq!(
            decode_snapped(0x20, &[40]),
            MetaMessage::ChannelPrefix(Channel::Sixteen)
        );
        assert_eq!(
            decode_snapped(0x59, &[0xF0, 3]),
            MetaMessage::KeySignature(KeySignature::new(-7, Mode::Minor).unwrap())
        );
        assert_eq!(
            decode_snapped(0x59, &[9, 0]),
            MetaMessage::KeySignature(KeySignature::new(7, Mode::Major).unwrap())
        );
        let snapped = decode_snapped(0x54, &[0x1F, 75, 61, 12, 150]);
        let MetaMessage::SmpteOffset(offset) = snapped else {
            panic!("expected an SMPTE offset");
        };
        assert_eq!(
            (offset.hour, offset.minute, offset.second, offset.frame, offset.subframe),
            (23, 59, 59, 12, 99)
        );
        // the frame rate bits have no limit to snap to
        let settings =
            ReadSettings::default().with_invalid_meta_value(InvalidMetaValuePolicy::SnapToLimits);
        assert_eq!(
            MetaMessage::decode(0x54, &[0x80, 0, 0, 0, 0], &settings).unwrap_err(),
            ParseError::Smpte(crate::SmpteError::TrackFrame(4))
        );
    }

    #[test]
    fn text_accessors() {
        let msg = MetaMessage::track_name("Piano");
        assert_eq!(msg.text_str(), Some("Piano"));
        assert_eq!(msg.status(), 0x03);
        assert_eq!(MetaMessage::EndOfTrack.text_bytes(), None);
    }
}
