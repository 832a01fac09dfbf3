#![doc = r#"
SMPTE frame rates

A file may count time in SMPTE frames instead of quarter notes, and a track
may announce an SMPTE start time. Both use one of four frame rates:

- 24 fps: film
- 25 fps: PAL/SECAM video
- 29.97 fps: NTSC color video, "drop frame"
- 30 fps: NTSC black and white, some digital formats
"#]

/// The possible FPS (Frames Per Second) for MIDI tracks and files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second
    TwentyFour,
    /// 25 frames per second
    TwentyFive,
    /// 29.97 frames per second (30000/1001), drop-frame
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// The nominal frame rate. Drop-frame 29.97 fps counts as 30.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine | Self::Thirty => 30,
        }
    }

    /// The actual frame rate, fractional for drop-frame
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }

    /// The rate from the negative high byte of a header division
    pub(crate) const fn from_header_byte(byte: i8) -> Option<Self> {
        Some(match byte {
            -24 => Self::TwentyFour,
            -25 => Self::TwentyFive,
            -29 => Self::TwentyNine,
            -30 => Self::Thirty,
            _ => return None,
        })
    }

    pub(crate) const fn header_byte(&self) -> u8 {
        let value: i8 = match self {
            Self::TwentyFour => -24,
            Self::TwentyFive => -25,
            Self::TwentyNine => -29,
            Self::Thirty => -30,
        };
        value as u8
    }

    /// The rate from the two `rr` bits of an SMPTE offset
    pub(crate) const fn from_offset_bits(bits: u8) -> Option<Self> {
        Some(match bits {
            0 => Self::TwentyFour,
            1 => Self::TwentyFive,
            2 => Self::TwentyNine,
            3 => Self::Thirty,
            _ => return None,
        })
    }

    pub(crate) const fn offset_bits(&self) -> u8 {
        match self {
            Self::TwentyFour => 0,
            Self::TwentyFive => 1,
            Self::TwentyNine => 2,
            Self::Thirty => 3,
        }
    }
}

/// 29.97002997... fps
const DROP_FRAME: f64 = 30_000. / 1001.;
