use core::{
    fmt,
    ops::{Add, AddAssign, Mul, Sub},
};

use super::{ConversionError, ConversionResult, TimeSpan, end_tick};
use crate::tempo::TempoMap;

const MICROS_PER_MILLI: u64 = 1_000;
const MICROS_PER_SECOND: u64 = 1_000_000;
const MICROS_PER_MINUTE: u64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: u64 = 60 * MICROS_PER_MINUTE;

/// Elapsed wall-clock time in microseconds
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricTime(u64);

impl MetricTime {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates a new instance of microseconds
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }
    /// ms -> us
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * MICROS_PER_MILLI)
    }
    /// Hours, minutes, seconds and milliseconds -> us
    pub const fn from_hms(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Self {
        Self(
            hours * MICROS_PER_HOUR
                + minutes * MICROS_PER_MINUTE
                + seconds * MICROS_PER_SECOND
                + millis * MICROS_PER_MILLI,
        )
    }

    /// Returns the microseconds
    pub const fn as_micros(&self) -> u64 {
        self.0
    }
    /// Whole milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.0 / MICROS_PER_MILLI
    }
    /// Returns seconds
    pub const fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / MICROS_PER_SECOND as f64
    }

    /// The hours component
    pub const fn hours(&self) -> u64 {
        self.0 / MICROS_PER_HOUR
    }
    /// The minutes component, `0..60`
    pub const fn minutes(&self) -> u64 {
        self.0 % MICROS_PER_HOUR / MICROS_PER_MINUTE
    }
    /// The seconds component, `0..60`
    pub const fn seconds(&self) -> u64 {
        self.0 % MICROS_PER_MINUTE / MICROS_PER_SECOND
    }
    /// The milliseconds component, `0..1000`
    pub const fn milliseconds(&self) -> u64 {
        self.0 % MICROS_PER_SECOND / MICROS_PER_MILLI
    }

    /// Returns no time if I am less than other.
    pub const fn saturating_sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
    /// `None` if other is greater
    pub const fn checked_sub(&self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(micros) => Some(Self(micros)),
            None => None,
        }
    }
}

impl TimeSpan for MetricTime {
    fn from_ticks(length: u64, start: u64, map: &TempoMap) -> ConversionResult<Self> {
        let end = micros_at(end_tick(start, length)?, map)?;
        let start = micros_at(start, map)?;
        end.checked_sub(start)
            .map(Self)
            .ok_or(ConversionError::NegativeLength)
    }

    fn to_ticks(&self, start: u64, map: &TempoMap) -> ConversionResult<u64> {
        let start_micros = micros_at(start, map)?;
        let end_micros = start_micros
            .checked_add(self.0)
            .ok_or(ConversionError::Overflow)?;
        // a position between ticks floors to the tick before it
        Ok(ticks_at(end_micros, map)?.saturating_sub(start))
    }
}

/// Microseconds from tick 0 to `ticks`.
///
/// Each tempo segment adds `ticks * tempo / tpqn`, floored per segment.
fn micros_at(ticks: u64, map: &TempoMap) -> ConversionResult<u64> {
    let tpqn = u128::from(map.ticks_per_quarter_note()?);
    let mut micros: u128 = 0;
    let mut segments = map.tempo_segments().peekable();
    while let Some((start, tempo)) = segments.next() {
        if start >= ticks {
            break;
        }
        let end = segments
            .peek()
            .map_or(ticks, |&(next, _)| next.min(ticks));
        micros += segment_micros(end - start, tempo.micros_per_quarter_note(), tpqn);
    }
    u64::try_from(micros).map_err(|_| ConversionError::Overflow)
}

fn segment_micros(ticks: u64, tempo: u32, tpqn: u128) -> u128 {
    u128::from(ticks) * u128::from(tempo) / tpqn
}

/// The tick at `micros` from tick 0, floored.
///
/// Exact inverse of [`micros_at`] at every tempo change. Between changes the
/// result is never past the tick whose time is `micros`.
fn ticks_at(micros: u64, map: &TempoMap) -> ConversionResult<u64> {
    let tpqn = u128::from(map.ticks_per_quarter_note()?);
    let target = u128::from(micros);

    let mut elapsed: u128 = 0;
    let mut segments = map.tempo_segments().peekable();
    while let Some((start, tempo)) = segments.next() {
        if let Some(&(next, _)) = segments.peek() {
            let length = segment_micros(next - start, tempo.micros_per_quarter_note(), tpqn);
            if elapsed + length <= target {
                elapsed += length;
                continue;
            }
        }
        let offset = (target - elapsed) * tpqn / u128::from(tempo.micros_per_quarter_note());
        return u64::try_from(offset)
            .ok()
            .and_then(|offset| start.checked_add(offset))
            .ok_or(ConversionError::Overflow);
    }
    Ok(0)
}

impl Add for MetricTime {
    type Output = MetricTime;
    fn add(self, rhs: Self) -> Self::Output {
        MetricTime(self.0 + rhs.0)
    }
}

impl AddAssign for MetricTime {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for MetricTime {
    type Output = MetricTime;
    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Mul<u64> for MetricTime {
    type Output = MetricTime;
    fn mul(self, rhs: u64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl fmt::Display for MetricTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02}:{:02}.{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.milliseconds()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        file::timing::{SmpteFps, Timing},
        message::meta::Tempo,
        time,
    };
    use alloc::format;
    use pretty_assertions::assert_eq;

    fn two_tempos() -> TempoMap {
        let mut map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
        map.set_tempo(0, Tempo::new(500_000));
        map.set_tempo(480, Tempo::new(250_000));
        map
    }

    #[test]
    fn tempo_change_round_trip() {
        let map = two_tempos();
        let at: MetricTime = time::to_time(480, &map).unwrap();
        assert_eq!(at, MetricTime::from_micros(2_500_000));
        assert_eq!(time::from_time(&at, &map), Ok(480));

        let after: MetricTime = time::to_time(576, &map).unwrap();
        assert_eq!(after.as_micros(), 2_750_000);
    }

    #[test]
    fn partial_ticks_floor() {
        let map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
        // one tick is 5208.33 µs
        assert_eq!(time::from_time(&MetricTime::from_micros(5_000), &map), Ok(0));
        assert_eq!(time::from_time(&MetricTime::from_micros(5_208), &map), Ok(0));
        assert_eq!(time::from_time(&MetricTime::from_micros(5_209), &map), Ok(1));
        assert_eq!(time::to_time(1, &map), Ok(MetricTime::from_micros(5_208)));
    }

    #[test]
    fn tempo_changes_are_exact_fixed_points() {
        let mut map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
        map.set_tempo(100, Tempo::new(333_333));
        map.set_tempo(250, Tempo::new(700_001));
        map.set_tempo(251, Tempo::new(123_457));
        for ticks in [0, 100, 250, 251] {
            let metric: MetricTime = time::to_time(ticks, &map).unwrap();
            assert_eq!(time::from_time(&metric, &map), Ok(ticks), "tick {ticks}");
        }
        for ticks in 0..1_000 {
            let metric: MetricTime = time::to_time(ticks, &map).unwrap();
            let back = time::from_time(&metric, &map).unwrap();
            assert!(back <= ticks && back + 1 >= ticks, "tick {ticks} came back as {back}");
        }
    }

    #[test]
    fn length_across_a_tempo_change() {
        let map = two_tempos();
        let length: MetricTime = time::to_length(96, 470, &map).unwrap();
        // 10 ticks at the first tempo, 86 at the second, each floored
        assert_eq!(length.as_micros(), 2_500_000 - 2_447_916 + 223_958);
        // a single scale factor at the start would give a full quarter note
        assert_ne!(length.as_micros(), 500_000);
        let to_change = MetricTime::from_micros(2_500_000 - 2_447_916);
        assert_eq!(time::from_length(&to_change, 470, &map), Ok(10));
    }

    #[test]
    fn default_tempo_before_first_change() {
        let mut map = TempoMap::new(Timing::new_ticks_per_quarter_note(96));
        map.set_tempo(96, Tempo::new(1_000_000));
        let at: MetricTime = time::to_time(192, &map).unwrap();
        assert_eq!(at.as_micros(), 1_500_000);
    }

    #[test]
    fn smpte_is_rejected() {
        let map = TempoMap::new(Timing::new_smpte(SmpteFps::Thirty, 80));
        assert_eq!(
            time::to_time::<MetricTime>(10, &map),
            Err(ConversionError::UnsupportedTimeDivision)
        );
        assert_eq!(
            time::from_time(&MetricTime::from_millis(10), &map),
            Err(ConversionError::UnsupportedTimeDivision)
        );
    }

    #[test]
    fn components_and_display() {
        let time = MetricTime::from_hms(1, 2, 3, 456) + MetricTime::from_micros(789);
        assert_eq!(
            (time.hours(), time.minutes(), time.seconds(), time.milliseconds()),
            (1, 2, 3, 456)
        );
        assert_eq!(format!("{time}"), "1:02:03.456");
        assert_eq!(MetricTime::from_millis(5) - MetricTime::from_millis(7), MetricTime::ZERO);
    }
}
