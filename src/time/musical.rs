use core::{
    fmt,
    ops::{Add, Sub},
};

use super::{ConversionError, ConversionResult, TimeSpan};
use crate::tempo::TempoMap;

#[doc = r#"
A length as a fraction of a whole note, always in lowest terms.

Musical lengths do not depend on tempo; a quarter note is one quarter note
wherever it starts.

```rust
use smfkit::prelude::*;

let map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
let dotted_quarter: MusicalTime = time::to_length(144, 0, &map).unwrap();
assert_eq!(dotted_quarter, MusicalTime::new(3, 8).unwrap());
assert_eq!(dotted_quarter.to_string(), "3/8");
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Fraction"))]
pub struct MusicalTime {
    numerator: u64,
    denominator: u64,
}

/// The unchecked wire form, reduced on the way in
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct Fraction {
    numerator: u64,
    denominator: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<Fraction> for MusicalTime {
    type Error = &'static str;
    fn try_from(value: Fraction) -> Result<Self, Self::Error> {
        Self::new(value.numerator, value.denominator).ok_or("musical time denominator is zero")
    }
}

impl MusicalTime {
    /// Nothing
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };
    /// A whole note
    pub const WHOLE: Self = Self {
        numerator: 1,
        denominator: 1,
    };
    /// A half note
    pub const HALF: Self = Self {
        numerator: 1,
        denominator: 2,
    };
    /// A quarter note
    pub const QUARTER: Self = Self {
        numerator: 1,
        denominator: 4,
    };
    /// An eighth note
    pub const EIGHTH: Self = Self {
        numerator: 1,
        denominator: 8,
    };

    /// `numerator / denominator` of a whole note, reduced. `None` for a zero denominator.
    pub const fn new(numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        if numerator == 0 {
            return Some(Self::ZERO);
        }
        let divisor = gcd(numerator, denominator);
        Some(Self {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        })
    }

    /// Numerator in lowest terms
    pub const fn numerator(&self) -> u64 {
        self.numerator
    }
    /// Denominator in lowest terms
    pub const fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Sum, or `None` on overflow
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let (left, right, denominator) = self.common(rhs)?;
        Self::new(left.checked_add(right)?, denominator)
    }
    /// Difference, or `None` if `rhs` is longer or on overflow
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        let (left, right, denominator) = self.common(rhs)?;
        Self::new(left.checked_sub(right)?, denominator)
    }

    /// Both numerators over the least common denominator
    fn common(self, rhs: Self) -> Option<(u64, u64, u64)> {
        let divisor = gcd(self.denominator, rhs.denominator);
        let denominator = (self.denominator / divisor).checked_mul(rhs.denominator)?;
        let left = self
            .numerator
            .checked_mul(denominator / self.denominator)?;
        let right = rhs.numerator.checked_mul(denominator / rhs.denominator)?;
        Some((left, right, denominator))
    }
}

const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

impl TimeSpan for MusicalTime {
    fn from_ticks(length: u64, _start: u64, map: &TempoMap) -> ConversionResult<Self> {
        let whole_note = 4 * u64::from(map.ticks_per_quarter_note()?);
        Self::new(length, whole_note).ok_or(ConversionError::UnsupportedTimeDivision)
    }

    fn to_ticks(&self, _start: u64, map: &TempoMap) -> ConversionResult<u64> {
        let whole_note = 4 * u128::from(map.ticks_per_quarter_note()?);
        let denominator = u128::from(self.denominator);
        let ticks = whole_note * u128::from(self.numerator) / denominator;
        u64::try_from(ticks).map_err(|_| ConversionError::Overflow)
    }
}

impl Default for MusicalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for MusicalTime {
    type Output = Self;
    /// Saturates at the largest representable length
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).unwrap_or(Self {
            numerator: u64::MAX,
            denominator: 1,
        })
    }
}

impl Sub for MusicalTime {
    type Output = Self;
    /// Saturates at zero
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).unwrap_or(Self::ZERO)
    }
}

impl PartialOrd for MusicalTime {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MusicalTime {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        let left = u128::from(self.numerator) * u128::from(other.denominator);
        let right = u128::from(other.numerator) * u128::from(self.denominator);
        left.cmp(&right)
    }
}

impl fmt::Display for MusicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{file::timing::Timing, message::meta::Tempo, time};
    use pretty_assertions::assert_eq;

    #[test]
    fn reduces_ticks() {
        let map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
        let cases = [
            (0, MusicalTime::ZERO),
            (96, MusicalTime::QUARTER),
            (384, MusicalTime::WHOLE),
            (36, MusicalTime::new(3, 32).unwrap()),
            (1, MusicalTime::new(1, 384).unwrap()),
            (960, MusicalTime::new(5, 2).unwrap()),
        ];
        for (ticks, expected) in cases {
            assert_eq!(time::to_time::<MusicalTime>(ticks, &map), Ok(expected));
            assert_eq!(time::from_time(&expected, &map), Ok(ticks));
        }
    }

    #[test]
    fn independent_of_tempo() {
        let mut map = TempoMap::new(Timing::new_ticks_per_quarter_note(480));
        map.set_tempo(100, Tempo::new(123_456));
        let at_zero: MusicalTime = time::to_length(240, 0, &map).unwrap();
        let later: MusicalTime = time::to_length(240, 90, &map).unwrap();
        assert_eq!(at_zero, MusicalTime::EIGHTH);
        assert_eq!(later, at_zero);
    }

    #[test]
    fn partial_ticks_floor() {
        let map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
        let triplet_sixteenth = MusicalTime::new(1, 24).unwrap();
        assert_eq!(time::from_time(&triplet_sixteenth, &map), Ok(16));
        // 76.8 ticks
        let fifth = MusicalTime::new(1, 5).unwrap();
        assert_eq!(time::from_time(&fifth, &map), Ok(76));
        let two_thirds_of_a_tick = MusicalTime::new(1, 576).unwrap();
        assert_eq!(time::from_time(&two_thirds_of_a_tick, &map), Ok(0));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(
            MusicalTime::QUARTER + MusicalTime::EIGHTH,
            MusicalTime::new(3, 8).unwrap()
        );
        assert_eq!(MusicalTime::HALF - MusicalTime::WHOLE, MusicalTime::ZERO);
        assert!(MusicalTime::new(2, 6).unwrap() > MusicalTime::QUARTER);
        assert_eq!(MusicalTime::new(2, 6), MusicalTime::new(1, 3));
        assert_eq!(MusicalTime::new(1, 0), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializing_reduces() {
        let half: MusicalTime =
            serde_json::from_str(r#"{"numerator": 2, "denominator": 4}"#).unwrap();
        assert_eq!(half, MusicalTime::HALF);
        let zero = serde_json::from_str::<MusicalTime>(r#"{"numerator": 1, "denominator": 0}"#);
        assert!(zero.is_err());

        let three_eighths = MusicalTime::new(3, 8).unwrap();
        let json = serde_json::to_string(&three_eighths).unwrap();
        assert_eq!(json, r#"{"numerator":3,"denominator":8}"#);
        let back: MusicalTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, three_eighths);
    }
}
