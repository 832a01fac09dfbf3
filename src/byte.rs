use core::fmt;

use crate::ParseError;

#[doc = r#"
A byte with its leading bit clear, used for every channel message parameter.

Data bytes are what separate a parameter from a status byte: a byte whose
most significant bit is set always starts a new message (or is an error),
while `0x00..=0x7F` may only appear as data.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// Check a byte for validity as a data byte.
    pub const fn new(byte: u8) -> Result<Self, ParseError> {
        if byte > 0x7F {
            return Err(ParseError::InvalidDataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Keep only the low seven bits of the byte.
    pub const fn new_masked(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// Clamp the byte into the data range.
    pub const fn new_saturating(byte: u8) -> Self {
        if byte > 0x7F { Self(0x7F) } else { Self(byte) }
    }

    /// The underlying value
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = ParseError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DataByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04X}", self.0)
    }
}

#[doc = r#"
One of the sixteen MIDI channels.

Channels are numbered `One` through `Sixteen` for humans; on the wire they
occupy the low nibble of a channel status byte (`0..=15`).
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Channel {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    const ALL: [Channel; 16] = [
        Channel::One,
        Channel::Two,
        Channel::Three,
        Channel::Four,
        Channel::Five,
        Channel::Six,
        Channel::Seven,
        Channel::Eight,
        Channel::Nine,
        Channel::Ten,
        Channel::Eleven,
        Channel::Twelve,
        Channel::Thirteen,
        Channel::Fourteen,
        Channel::Fifteen,
        Channel::Sixteen,
    ];

    /// Build a channel from the low nibble of a status byte.
    ///
    /// Upper bits are ignored.
    pub const fn from_status(status: u8) -> Self {
        Self::ALL[(status & 0x0F) as usize]
    }

    /// Build a channel from a zero based index, if it is in range.
    pub const fn from_index(index: u8) -> Option<Self> {
        if index > 15 {
            return None;
        }
        Some(Self::ALL[index as usize])
    }

    /// Zero based index of the channel, as written in a status byte.
    pub const fn index(&self) -> u8 {
        *self as u8
    }

    /// Iterate over all sixteen channels in order.
    pub fn all() -> impl Iterator<Item = Channel> {
        Self::ALL.into_iter()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}

#[test]
fn channel_nibble() {
    use pretty_assertions::assert_eq;
    assert_eq!(Channel::from_status(0x9A), Channel::Eleven);
    assert_eq!(Channel::Eleven.index(), 10);
    assert_eq!(Channel::from_index(16), None);
    assert_eq!(Channel::all().count(), 16);
}

#[test]
fn data_byte_range() {
    use pretty_assertions::assert_eq;
    assert_eq!(DataByte::new(0x80), Err(ParseError::InvalidDataByte(0x80)));
    assert_eq!(DataByte::new_masked(0x81).value(), 0x01);
    assert_eq!(DataByte::new_saturating(0xF0).value(), 0x7F);
}
