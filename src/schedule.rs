use crate::range::{BusyRange, RangeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Busy ranges of one person (or a group) on one day.
///
/// A schedule built with [`Schedule::append`] or [`Schedule::from_ranges`] keeps
/// the ranges exactly as given. [`Schedule::union`] always returns the canonical
/// form: sorted by start, pairwise disjoint, and no two ranges touching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    ranges: Vec<BusyRange>,
}

impl Schedule {
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    pub fn from_ranges(ranges: impl IntoIterator<Item = BusyRange>) -> Self {
        Self {
            ranges: ranges.into_iter().collect(),
        }
    }

    /// Build from textual `(from, to)` pairs, e.g. `[("09:00", "12:00")]`.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self, RangeError> {
        pairs
            .iter()
            .map(|&pair| BusyRange::try_from(pair))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from_ranges)
    }

    pub fn append(&mut self, range: BusyRange) {
        self.ranges.push(range);
    }

    pub fn ranges(&self) -> &[BusyRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total busy time covered by `self` or `other`, in canonical form.
    pub fn union(&self, other: &Schedule) -> Schedule {
        let mut working: Vec<BusyRange> = Vec::with_capacity(self.len() + other.len());
        working.extend_from_slice(&self.ranges);
        working.extend_from_slice(&other.ranges);
        working.sort_unstable_by_key(|r| r.from());

        let mut iter = working.into_iter();
        let Some(first) = iter.next() else {
            return Schedule::empty();
        };

        let mut merged = Vec::new();
        let (mut cur_from, mut cur_to) = (first.from(), first.to());
        for r in iter {
            if r.from() <= cur_to {
                // overlapping or touching
                cur_to = cur_to.max(r.to());
            } else {
                merged.push(BusyRange::new_unchecked(cur_from, cur_to));
                (cur_from, cur_to) = (r.from(), r.to());
            }
        }
        merged.push(BusyRange::new_unchecked(cur_from, cur_to));

        Schedule { ranges: merged }
    }

    pub fn normalized(&self) -> Schedule {
        self.union(&Schedule::empty())
    }

    pub fn is_canonical(&self) -> bool {
        self.ranges.windows(2).all(|pair| pair[0].to() < pair[1].from())
    }

    pub fn total_busy_minutes(&self) -> u32 {
        self.normalized()
            .ranges
            .iter()
            .map(BusyRange::duration_minutes)
            .sum()
    }

    /// One `HH:MM — HH:MM` line per range; empty string when there are none.
    pub fn format(&self) -> String {
        self.ranges
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl From<Vec<BusyRange>> for Schedule {
    fn from(ranges: Vec<BusyRange>) -> Self {
        Self { ranges }
    }
}

impl FromIterator<BusyRange> for Schedule {
    fn from_iter<I: IntoIterator<Item = BusyRange>>(iter: I) -> Self {
        Self::from_ranges(iter)
    }
}

impl Extend<BusyRange> for Schedule {
    fn extend<I: IntoIterator<Item = BusyRange>>(&mut self, iter: I) {
        self.ranges.extend(iter);
    }
}

impl Add for &Schedule {
    type Output = Schedule;

    fn add(self, rhs: &Schedule) -> Schedule {
        self.union(rhs)
    }
}

impl Add for Schedule {
    type Output = Schedule;

    fn add(self, rhs: Schedule) -> Schedule {
        self.union(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(pairs: &[(&str, &str)]) -> Schedule {
        Schedule::from_pairs(pairs).unwrap()
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut schedule = s(&[("14:00", "16:00")]);
        schedule.append(BusyRange::new_from_text("09:00", "10:00").unwrap());
        assert_eq!(schedule.format(), "14:00 — 16:00\n09:00 — 10:00");
        assert!(!schedule.is_canonical());
    }

    #[test]
    fn union_merges_nested_ranges() {
        let merged = s(&[("09:00", "17:00")]).union(&s(&[("10:00", "11:00"), ("12:00", "13:00")]));
        assert_eq!(merged, s(&[("09:00", "17:00")]));
    }

    #[test]
    fn one_minute_gap_stays_separate() {
        let merged = s(&[("09:00", "09:59")]).union(&s(&[("10:00", "11:00")]));
        assert_eq!(merged.len(), 2);
        assert!(merged.is_canonical());
    }

    #[test]
    fn zero_length_range_inside_gap_survives_alone() {
        let merged = s(&[("09:00", "10:00"), ("12:00", "12:00")]).normalized();
        assert_eq!(merged, s(&[("09:00", "10:00"), ("12:00", "12:00")]));
    }

    #[test]
    fn total_busy_minutes_counts_overlap_once() {
        let schedule = s(&[("09:00", "11:00"), ("10:00", "12:00")]);
        assert_eq!(schedule.total_busy_minutes(), 180);
    }

    #[test]
    fn empty_formats_as_empty_string() {
        assert_eq!(Schedule::empty().format(), "");
        assert_eq!((&Schedule::empty() + &Schedule::empty()), Schedule::empty());
    }

    #[test]
    fn serializes_as_range_list() {
        let json = serde_json::to_string(&s(&[("09:00", "10:00")])).unwrap();
        assert_eq!(json, r#"[{"from":"09:00","to":"10:00"}]"#);
    }
}
