mod smpte;
pub use smpte::*;

use crate::{ParseError, SmpteError};

/// The header timing type.
///
/// This is either the number of ticks per quarter note or the alternative
/// SMPTE format. Only the former gives ticks a musical meaning, so only the
/// former is accepted by the time conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Delta times count fractions of a quarter note
    TicksPerQuarterNote(TicksPerQuarterNote),

    /// Delta times count fractions of an SMPTE frame
    Smpte(SmpteHeader),
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the u16 is disregarded, so 1-32767. Zero is raised to one.
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        let tpqn = tpqn & 0x7FFF;
        Self::TicksPerQuarterNote(TicksPerQuarterNote(if tpqn == 0 { 1 } else { tpqn }))
    }

    /// Define the timing in terms of fps and ticks per frame
    pub const fn new_smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte(SmpteHeader {
            fps,
            ticks_per_frame,
        })
    }

    /// Decode the division word of a header chunk
    pub const fn from_bytes(bytes: [u8; 2]) -> Result<Self, ParseError> {
        if bytes[0] >> 7 == 0 {
            let tpqn = u16::from_be_bytes(bytes);
            return Ok(Self::new_ticks_per_quarter_note(tpqn));
        }
        match SmpteHeader::new(bytes) {
            Ok(header) => Ok(Self::Smpte(header)),
            Err(e) => Err(ParseError::Smpte(e)),
        }
    }

    /// Encode the division word of a header chunk
    pub const fn to_bytes(&self) -> [u8; 2] {
        match self {
            Self::TicksPerQuarterNote(t) => t.0.to_be_bytes(),
            Self::Smpte(s) => [s.fps.header_byte(), s.ticks_per_frame],
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(t.0),
            _ => None,
        }
    }
}

impl Default for Timing {
    /// 96 ticks per quarter note
    fn default() -> Self {
        Self::new_ticks_per_quarter_note(96)
    }
}

/// A representation of the `tpqn` timing for a MIDI file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicksPerQuarterNote(u16);

impl TicksPerQuarterNote {
    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.0
    }
}

/// A representation of the `smpte` timing for a MIDI file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    fps: SmpteFps,
    ticks_per_frame: u8,
}

impl SmpteHeader {
    const fn new(bytes: [u8; 2]) -> Result<Self, SmpteError> {
        // the high byte holds -24, -25, -29 or -30 in two's complement
        let byte = bytes[0] as i8;
        let fps = match SmpteFps::from_header_byte(byte) {
            Some(fps) => fps,
            None => return Err(SmpteError::HeaderFrameTime(byte)),
        };
        Ok(Self {
            fps,
            ticks_per_frame: bytes[1],
        })
    }

    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }
}

#[test]
fn division_words() {
    use pretty_assertions::assert_eq;
    let tpqn = Timing::from_bytes([0x01, 0xE0]).unwrap();
    assert_eq!(tpqn.ticks_per_quarter_note(), Some(480));
    assert_eq!(tpqn.to_bytes(), [0x01, 0xE0]);

    let smpte = Timing::from_bytes([0xE7, 0x28]).unwrap();
    assert_eq!(smpte, Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(smpte.ticks_per_quarter_note(), None);
    assert_eq!(smpte.to_bytes(), [0xE7, 0x28]);

    assert_eq!(
        Timing::from_bytes([0xE0, 0x28]),
        Err(ParseError::Smpte(SmpteError::HeaderFrameTime(-32)))
    );
}
