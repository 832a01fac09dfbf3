use alloc::vec::Vec;

use crate::message::Ticked;

/// A value that changes at tick positions, with a default before the first change.
///
/// Changes are sorted by tick and hold at most one value per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValueLine<T> {
    default: T,
    changes: Vec<Ticked<T>>,
}

impl<T: Copy> ValueLine<T> {
    pub(crate) const fn new(default: T) -> Self {
        Self {
            default,
            changes: Vec::new(),
        }
    }

    /// Set `value` from `ticks` on, replacing a change at the same tick
    pub(crate) fn set(&mut self, ticks: u64, value: T) {
        match self.changes.binary_search_by_key(&ticks, Ticked::ticks) {
            Ok(index) => self.changes[index] = Ticked::new(ticks, value),
            Err(index) => self.changes.insert(index, Ticked::new(ticks, value)),
        }
    }

    /// The value in effect at `ticks`
    pub(crate) fn value_at(&self, ticks: u64) -> T {
        let index = self.changes.partition_point(|c| c.ticks() <= ticks);
        match index {
            0 => self.default,
            i => *self.changes[i - 1].event(),
        }
    }

    pub(crate) fn changes(&self) -> &[Ticked<T>] {
        &self.changes
    }

    /// Runs of constant value as `(start, value)`, the first starting at tick 0
    pub(crate) fn segments(&self) -> impl Iterator<Item = (u64, T)> + '_ {
        let leading = match self.changes.first() {
            Some(first) if first.ticks() == 0 => None,
            _ => Some((0, self.default)),
        };
        leading
            .into_iter()
            .chain(self.changes.iter().map(|c| (c.ticks(), *c.event())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn later_value_at_same_tick_wins() {
        let mut line = ValueLine::new(1u32);
        line.set(10, 2);
        line.set(5, 3);
        line.set(10, 4);
        assert_eq!(
            line.changes(),
            [Ticked::new(5, 3), Ticked::new(10, 4)]
        );
        assert_eq!(line.value_at(0), 1);
        assert_eq!(line.value_at(5), 3);
        assert_eq!(line.value_at(9), 3);
        assert_eq!(line.value_at(10), 4);
    }

    #[test]
    fn segments_start_at_zero() {
        let mut line = ValueLine::new(1u32);
        line.set(10, 2);
        assert_eq!(line.segments().collect::<Vec<_>>(), [(0, 1), (10, 2)]);
        line.set(0, 7);
        assert_eq!(line.segments().collect::<Vec<_>>(), [(0, 7), (10, 2)]);
    }
}
