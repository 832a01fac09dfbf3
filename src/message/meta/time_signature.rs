use core::fmt;

use crate::MetaError;

#[doc = r#"
The meter of a piece, as carried by a Time Signature meta event.

```text
FF 58 04 nn dd cc bb
```

`nn` is the numerator and `dd` the denominator as a power of two, so 6/8 is
written `06 03`. `cc` counts MIDI clocks per metronome click and `bb` the
notated 32nd notes in a MIDI quarter note.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: u8,
    denominator_power: u8,
    clocks_per_click: u8,
    thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// 4/4, 24 clocks per click, 8 32nds per quarter
    pub const DEFAULT: Self = Self {
        numerator: 4,
        denominator_power: 2,
        clocks_per_click: 24,
        thirty_seconds_per_quarter: 8,
    };

    /// A time signature with default click settings.
    ///
    /// The denominator must be a power of two and the numerator positive.
    pub const fn new(numerator: u8, denominator: u32) -> Result<Self, MetaError> {
        if numerator == 0 {
            return Err(MetaError::Numerator);
        }
        if !denominator.is_power_of_two() {
            return Err(MetaError::Denominator(denominator));
        }
        Ok(Self {
            numerator,
            denominator_power: denominator.trailing_zeros() as u8,
            ..Self::DEFAULT
        })
    }

    /// Replace the metronome settings
    pub const fn with_clocks(
        mut self,
        clocks_per_click: u8,
        thirty_seconds_per_quarter: u8,
    ) -> Self {
        self.clocks_per_click = clocks_per_click;
        self.thirty_seconds_per_quarter = thirty_seconds_per_quarter;
        self
    }

    /// Beats per bar
    pub const fn numerator(&self) -> u8 {
        self.numerator
    }
    /// The note value of one beat
    pub const fn denominator(&self) -> u32 {
        1 << self.denominator_power
    }
    /// MIDI clocks per metronome click
    pub const fn clocks_per_click(&self) -> u8 {
        self.clocks_per_click
    }
    /// Notated 32nd notes per MIDI quarter note
    pub const fn thirty_seconds_per_quarter(&self) -> u8 {
        self.thirty_seconds_per_quarter
    }

    /// Length of one beat in ticks, floored when a beat is not a whole number of ticks
    pub const fn beat_length(&self, ticks_per_quarter_note: u16) -> u64 {
        4 * ticks_per_quarter_note as u64 / self.denominator() as u64
    }

    /// Length of one bar in ticks
    pub const fn bar_length(&self, ticks_per_quarter_note: u16) -> u64 {
        self.numerator as u64 * self.beat_length(ticks_per_quarter_note)
    }

    pub(crate) const fn from_bytes(bytes: [u8; 4]) -> Result<Self, MetaError> {
        if bytes[1] > 31 {
            return Err(MetaError::DenominatorPower(bytes[1]));
        }
        Ok(Self {
            numerator: bytes[0],
            denominator_power: bytes[1],
            clocks_per_click: bytes[2],
            thirty_seconds_per_quarter: bytes[3],
        })
    }

    pub(crate) const fn to_bytes(self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_power,
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator())
    }
}

#[test]
fn six_eight() {
    use pretty_assertions::assert_eq;
    let sig = TimeSignature::new(6, 8).unwrap();
    assert_eq!(sig.to_bytes(), [6, 3, 24, 8]);
    assert_eq!(sig.beat_length(96), 48);
    assert_eq!(sig.bar_length(96), 288);
    assert_eq!(TimeSignature::new(3, 6), Err(MetaError::Denominator(6)));
    assert_eq!(TimeSignature::new(0, 4), Err(MetaError::Numerator));
    assert_eq!(
        TimeSignature::from_bytes([4, 40, 24, 8]),
        Err(MetaError::DenominatorPower(40))
    );
}
