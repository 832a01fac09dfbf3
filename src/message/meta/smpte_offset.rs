#![doc = r#"
SMPTE Offset: the SMPTE time at which a track is meant to start.

```text
FF 54 05 hr mn se fr ff
```

The top bits of `hr` select the frame rate (`0rrhhhhh`); `ff` counts
hundredths of a frame.
"#]

use core::fmt;

use crate::{SmpteError, file::timing::SmpteFps};

/// A track's starting position in SMPTE time code.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// Frame rate of the offset
    pub fps: SmpteFps,
    /// Hours, `0..=23`
    pub hour: u8,
    /// Minutes, `0..=59`
    pub minute: u8,
    /// Seconds, `0..=59`
    pub second: u8,
    /// Frames within the second
    pub frame: u8,
    /// Hundredths of a frame, `0..=99`
    pub subframe: u8,
}

impl SmpteOffset {
    /// Wall clock microseconds from zero to this offset
    pub fn as_micros(&self) -> f64 {
        let whole_seconds =
            self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64;
        let frames = self.frame as f64 + self.subframe as f64 / 100.;
        (whole_seconds * 1_000_000) as f64 + frames * 1_000_000. / self.fps.as_f64()
    }

    /// Decode the five payload bytes, validating every field.
    ///
    /// # Errors
    /// - [`SmpteError::Length`] unless exactly five bytes are given
    /// - [`SmpteError::TrackFrame`] for frame rate bits above 3
    /// - [`SmpteError::HourOffset`], [`SmpteError::MinuteOffset`],
    ///   [`SmpteError::SecondOffset`] and [`SmpteError::Subframe`] for out of range fields
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        Self::decode(data, false)
    }

    /// Decode the five payload bytes, clamping hours, minutes, seconds and
    /// subframes to their limits.
    ///
    /// # Errors
    /// [`SmpteError::Length`] and [`SmpteError::TrackFrame`] as for [`SmpteOffset::parse`]
    pub const fn parse_clamped(data: &[u8]) -> Result<Self, SmpteError> {
        Self::decode(data, true)
    }

    const fn decode(data: &[u8], clamp: bool) -> Result<Self, SmpteError> {
        let [rate_hour, minute, second, frame, subframe] = match data {
            [a, b, c, d, e] => [*a, *b, *c, *d, *e],
            _ => return Err(SmpteError::Length(data.len())),
        };
        let fps = match SmpteFps::from_offset_bits(rate_hour >> 5) {
            Some(fps) => fps,
            None => return Err(SmpteError::TrackFrame(rate_hour >> 5)),
        };
        let hour = match limit(rate_hour & 0b0001_1111, 23, clamp) {
            Ok(hour) => hour,
            Err(hour) => return Err(SmpteError::HourOffset(hour)),
        };
        let minute = match limit(minute, 59, clamp) {
            Ok(minute) => minute,
            Err(minute) => return Err(SmpteError::MinuteOffset(minute)),
        };
        let second = match limit(second, 59, clamp) {
            Ok(second) => second,
            Err(second) => return Err(SmpteError::SecondOffset(second)),
        };
        let subframe = match limit(subframe, 99, clamp) {
            Ok(subframe) => subframe,
            Err(subframe) => return Err(SmpteError::Subframe(subframe)),
        };
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// The five payload bytes
    pub const fn to_bytes(&self) -> [u8; 5] {
        [
            (self.fps.offset_bits() << 5) | (self.hour & 0b0001_1111),
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }
}

/// `value` if it is at most `max`, else `max` when clamping or the value as the error
const fn limit(value: u8, max: u8, clamp: bool) -> Result<u8, u8> {
    if value <= max {
        Ok(value)
    } else if clamp {
        Ok(max)
    } else {
        Err(value)
    }
}

impl fmt::Display for SmpteOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}.{:02}",
            self.hour, self.minute, self.second, self.frame, self.subframe
        )
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    let bytes = [0x41, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::parse(&bytes).unwrap();

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.to_string(), "01:23:45:12.34");
    assert_eq!(offset.to_bytes(), bytes);
}

#[test]
fn offset_micros() {
    use pretty_assertions::assert_eq;
    let offset = SmpteOffset::parse(&[0x20, 0, 1, 5, 0]).unwrap();
    assert_eq!(offset.fps, SmpteFps::TwentyFive);
    assert_eq!(offset.as_micros(), 1_200_000.);
}
