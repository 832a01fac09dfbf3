use core::fmt;

use crate::MetaError;

/// Major or minor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// A key, as carried by a Key Signature meta event.
///
/// `key` counts sharps when positive and flats when negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    key: i8,
    mode: Mode,
}

impl KeySignature {
    /// C major
    pub const DEFAULT: Self = Self {
        key: 0,
        mode: Mode::Major,
    };

    /// A key with `key` sharps (or flats, if negative) in `-7..=7`
    pub const fn new(key: i8, mode: Mode) -> Result<Self, MetaError> {
        if key < -7 || key > 7 {
            return Err(MetaError::Key(key));
        }
        Ok(Self { key, mode })
    }
    /// Sharps (positive) or flats (negative)
    pub const fn key(&self) -> i8 {
        self.key
    }
    /// Major or minor
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) const fn from_bytes(bytes: [u8; 2]) -> Result<Self, MetaError> {
        let mode = match bytes[1] {
            0 => Mode::Major,
            1 => Mode::Minor,
            v => return Err(MetaError::Scale(v)),
        };
        Self::new(bytes[0] as i8, mode)
    }

    /// Like `from_bytes`, with the key clamped to `-7..=7` and any scale above 1 read as minor
    pub(crate) const fn from_bytes_clamped(bytes: [u8; 2]) -> Self {
        let key = bytes[0] as i8;
        let key = if key < -7 {
            -7
        } else if key > 7 {
            7
        } else {
            key
        };
        let mode = if bytes[1] == 0 { Mode::Major } else { Mode::Minor };
        Self { key, mode }
    }

    pub(crate) const fn to_bytes(self) -> [u8; 2] {
        let scale = match self.mode {
            Mode::Major => 0,
            Mode::Minor => 1,
        };
        [self.key as u8, scale]
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accidental = if self.key < 0 { "b" } else { "#" };
        let mode = match self.mode {
            Mode::Major => "major",
            Mode::Minor => "minor",
        };
        write!(f, "{}{} {}", self.key.unsigned_abs(), accidental, mode)
    }
}

#[test]
fn flats_round_trip() {
    use pretty_assertions::assert_eq;
    let key = KeySignature::from_bytes([0xFD, 1]).unwrap();
    assert_eq!(key.key(), -3);
    assert_eq!(key.mode(), Mode::Minor);
    assert_eq!(key.to_bytes(), [0xFD, 1]);
    assert_eq!(KeySignature::from_bytes([8, 0]), Err(MetaError::Key(8)));
    assert_eq!(KeySignature::from_bytes([0, 2]), Err(MetaError::Scale(2)));
}
