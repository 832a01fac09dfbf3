use core::{fmt, ops::{Add, Sub}};

use super::{ConversionResult, TimeSpan};
use crate::tempo::TempoMap;

/// A raw tick count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiTime(pub u64);

impl MidiTime {
    /// The tick count
    pub const fn ticks(&self) -> u64 {
        self.0
    }
}

impl TimeSpan for MidiTime {
    fn from_ticks(length: u64, _start: u64, _map: &TempoMap) -> ConversionResult<Self> {
        Ok(Self(length))
    }
    fn to_ticks(&self, _start: u64, _map: &TempoMap) -> ConversionResult<u64> {
        Ok(self.0)
    }
}

impl Add for MidiTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for MidiTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl From<u64> for MidiTime {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MidiTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
