use core::fmt;

/// Microseconds per quarter note, as carried by a Set Tempo meta event.
///
/// The value occupies three bytes on the wire, so it ranges over
/// `1..=0xFF_FFFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Tempo {
    /// 500 000 µs per quarter note, or 120 beats per minute.
    ///
    /// In effect wherever no tempo event says otherwise.
    pub const DEFAULT: Self = Self(500_000);
    /// Largest tempo the wire format can hold
    pub const MAX: Self = Self(0x00FF_FFFF);

    /// Create a tempo, clamping into `1..=0xFF_FFFF`
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        if micros_per_quarter_note == 0 {
            Self(1)
        } else if micros_per_quarter_note > Self::MAX.0 {
            Self::MAX
        } else {
            Self(micros_per_quarter_note)
        }
    }

    /// Create a tempo from beats per minute
    pub fn from_bpm(bpm: f64) -> Self {
        Self::new((60_000_000. / bpm) as u32)
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Beats per minute
    pub fn bpm(&self) -> f64 {
        60_000_000. / self.0 as f64
    }

    pub(crate) const fn from_be_bytes(bytes: [u8; 3]) -> u32 {
        u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
    }

    pub(crate) const fn to_be_bytes(self) -> [u8; 3] {
        let [_, a, b, c] = self.0.to_be_bytes();
        [a, b, c]
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} µs/qn", self.0)
    }
}

#[test]
fn bpm_conversions() {
    use pretty_assertions::assert_eq;
    assert_eq!(Tempo::DEFAULT.bpm(), 120.);
    assert_eq!(Tempo::from_bpm(60.), Tempo::new(1_000_000));
    assert_eq!(Tempo::new(0), Tempo::new(1));
    assert_eq!(Tempo::new(u32::MAX), Tempo::MAX);
    assert_eq!(Tempo::new(0x07A120).to_be_bytes(), [0x07, 0xA1, 0x20]);
}
