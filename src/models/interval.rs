use std::cmp::{max, min};
use std::fmt;

/// A closed genomic interval: both `start` and `end` are included.
///
/// Coordinates are 1-based `u32` values, which is sufficient for every
/// chromosome of every species commonly annotated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    /// Creates a new interval, swapping the coordinates if they
    /// arrive in reverse order.
    pub fn new(start: u32, end: u32) -> Interval {
        if start <= end {
            Interval { start, end }
        } else {
            Interval {
                start: end,
                end: start,
            }
        }
    }

    /// Returns the number of bp covered by the interval
    pub fn len(&self) -> u32 {
        // counting the first base as part of the interval
        self.end - self.start + 1
    }

    /// Only implemented to satisfy clippy. Closed intervals cannot be empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Overlap between two closed intervals.
    ///
    /// Negative means disjoint, zero means the intervals share exactly
    /// one base, positive means strict overlap.
    pub fn overlap(&self, other: &Interval) -> i64 {
        i64::from(min(self.end, other.end)) - i64::from(max(self.start, other.start))
    }

    /// Returns `true` if the two intervals share at least one base.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.overlap(other) >= 0
    }

    /// Returns `true` if `other` lies completely within `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the intersection of two intervals, if any.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        if self.overlaps(other) {
            Some(Interval {
                start: max(self.start, other.start),
                end: min(self.end, other.end),
            })
        } else {
            None
        }
    }

    /// Returns the union of two overlapping (or touching) intervals.
    pub fn union(&self, other: &Interval) -> Option<Interval> {
        if self.overlaps(other) {
            Some(Interval {
                start: min(self.start, other.start),
                end: max(self.end, other.end),
            })
        } else {
            None
        }
    }

    /// Subtracts `other` from `self`, returning the remaining pieces.
    pub fn subtract(&self, other: &Interval) -> Vec<Interval> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        let mut pieces = vec![];
        if self.start < other.start {
            pieces.push(Interval {
                start: self.start,
                end: other.start - 1,
            });
        }
        if self.end > other.end {
            pieces.push(Interval {
                start: other.end + 1,
                end: self.end,
            });
        }
        pieces
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl From<(u32, u32)> for Interval {
    fn from(pair: (u32, u32)) -> Interval {
        Interval::new(pair.0, pair.1)
    }
}

/// Merges a list of intervals into a sorted, non-overlapping set.
///
/// Touching intervals ([1,5] and [6,10]) remain separate segments;
/// only actually overlapping or identical intervals are joined.
pub fn merge(mut intervals: Vec<Interval>) -> Vec<Interval> {
    if intervals.is_empty() {
        return intervals;
    }
    intervals.sort();
    let mut merged: Vec<Interval> = vec![intervals[0]];
    for iv in intervals.into_iter().skip(1) {
        let last = merged.last_mut().unwrap();
        if iv.start <= last.end {
            last.end = max(last.end, iv.end);
        } else {
            merged.push(iv);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_sign() {
        // strict overlap
        assert!(Interval::new(1, 10).overlap(&Interval::new(5, 15)) > 0);
        // sharing one base counts as zero
        assert_eq!(Interval::new(1, 5).overlap(&Interval::new(5, 9)), 0);
        // disjoint
        assert!(Interval::new(1, 5).overlap(&Interval::new(7, 9)) < 0);
        // book-ended exons do not overlap
        assert_eq!(Interval::new(1, 5).overlap(&Interval::new(6, 9)), -1);
    }

    #[test]
    fn test_len_is_inclusive() {
        assert_eq!(Interval::new(1, 1).len(), 1);
        assert_eq!(Interval::new(100, 200).len(), 101);
    }

    #[test]
    fn test_contains() {
        let outer = Interval::new(100, 250);
        assert!(outer.contains(&Interval::new(150, 180)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&Interval::new(90, 180)));
        assert!(!outer.contains(&Interval::new(150, 280)));
    }

    #[test]
    fn test_intersect_union() {
        let a = Interval::new(3, 5);
        let b = Interval::new(2, 6);
        assert_eq!(a.intersect(&b), Some(Interval::new(3, 5)));
        assert_eq!(a.union(&b), Some(Interval::new(2, 6)));
        assert_eq!(a.intersect(&Interval::new(7, 9)), None);
    }

    #[test]
    fn test_subtract() {
        let a = Interval::new(3, 9);
        assert_eq!(a.subtract(&Interval::new(1, 2)), vec![a]);
        assert_eq!(a.subtract(&Interval::new(3, 9)), vec![]);
        assert_eq!(
            a.subtract(&Interval::new(5, 6)),
            vec![Interval::new(3, 4), Interval::new(7, 9)]
        );
        assert_eq!(a.subtract(&Interval::new(1, 4)), vec![Interval::new(5, 9)]);
        assert_eq!(a.subtract(&Interval::new(8, 12)), vec![Interval::new(3, 7)]);
    }

    #[test]
    fn test_merge() {
        let merged = merge(vec![
            Interval::new(10, 20),
            Interval::new(15, 25),
            Interval::new(30, 40),
        ]);
        assert_eq!(merged, vec![Interval::new(10, 25), Interval::new(30, 40)]);

        // touching segments stay separate
        let merged = merge(vec![Interval::new(1, 5), Interval::new(6, 10)]);
        assert_eq!(merged.len(), 2);
    }
}
