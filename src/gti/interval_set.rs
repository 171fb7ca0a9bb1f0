//! A validated container for sorted, non-overlapping good-time intervals.
//!
//! [`IntervalSet`] wraps a `Vec<Interval<U>>` and guarantees the **GTI
//! invariant** at all times: every interval is well formed, intervals are
//! sorted by start, and no two intervals overlap. Touching intervals
//! (`end[i] == start[i + 1]`) are legal; [`IntervalSet::join_touching`]
//! merges them explicitly.
//!
//! Sets are never mutated in place. Every algebra operation returns a new
//! set, and read access is transparent via `Deref<Target = [Interval<U>]>`.

use std::fmt::Display;
use std::ops::{Deref, Index};

use qtty::{Quantity, Unit};

use super::error::GtiError;
use super::interval::Interval;
use super::operations;

/// A sorted, non-overlapping set of closed intervals.
///
/// # Transparent read access
///
/// `IntervalSet<U>` implements `Deref<Target = [Interval<U>]>`, so all
/// immutable slice methods (`.len()`, `.iter()`, indexing, `.first()`,
/// `.last()`, `.windows()`, etc.) are available directly.
///
/// # Example
///
/// ```rust
/// use allsky::gti::IntervalSet;
/// use qtty::Second;
///
/// let a = IntervalSet::<Second>::from_pairs(&[(1.0, 4.0)]).unwrap();
/// let b = IntervalSet::<Second>::from_pairs(&[(1.0, 2.0), (2.0, 4.0)]).unwrap();
/// assert_eq!(a.intersect(&b).to_pairs(), vec![(1.0, 4.0)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSet<U: Unit>(Vec<Interval<U>>);

// ─────────────────────────────────────────────────────────────────────
// Constructors
// ─────────────────────────────────────────────────────────────────────

impl<U: Unit> IntervalSet<U> {
    /// Creates an empty interval set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Validates `intervals` and wraps them without any repair.
    pub fn try_from_vec(intervals: Vec<Interval<U>>) -> Result<Self, GtiError> {
        operations::assertions::validate(&intervals)?;
        Ok(Self(intervals))
    }

    /// Builds a set from raw `(start, end)` pairs, e.g. a loaded GTI table.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, GtiError> {
        let intervals = pairs
            .iter()
            .enumerate()
            .map(|(index, &(start, end))| {
                Interval::try_new(Quantity::new(start), Quantity::new(end)).map_err(|e| match e {
                    GtiError::MalformedIntervals { reason, .. } => {
                        GtiError::MalformedIntervals { index, reason }
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from_vec(intervals)
    }

    /// Wraps a `Vec` that is **already valid** without checking.
    ///
    /// In debug builds this asserts the invariant.
    pub(crate) fn from_sorted_unchecked(vec: Vec<Interval<U>>) -> Self {
        debug_assert!(
            operations::assertions::is_canonical(&vec),
            "IntervalSet::from_sorted_unchecked called with non-canonical input"
        );
        Self(vec)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────

impl<U: Unit> IntervalSet<U> {
    /// Checks the GTI invariant on an arbitrary interval slice.
    pub fn validate(intervals: &[Interval<U>]) -> Result<(), GtiError> {
        operations::assertions::validate(intervals)
    }

    /// Sum of `end - start` over all intervals.
    pub fn total_duration(&self) -> Quantity<U> {
        Quantity::new(self.0.iter().map(|iv| iv.duration().value()).sum())
    }

    /// Interval from the first start to the last end, if any.
    pub fn span(&self) -> Option<Interval<U>> {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => Some(Interval::new(first.start(), last.end())),
            _ => None,
        }
    }

    /// True iff the overall spans of the two sets do not interleave.
    pub fn are_disjoint(&self, other: &IntervalSet<U>) -> bool {
        operations::are_disjoint(&self.0, &other.0)
    }

    /// Returns true if `position` lies inside any interval.
    pub fn contains(&self, position: Quantity<U>) -> bool {
        let idx = self
            .0
            .partition_point(|iv| iv.end().value() < position.value());
        self.0.get(idx).is_some_and(|iv| iv.contains(position))
    }

    /// Consumes the set and returns the underlying `Vec`.
    pub fn into_inner(self) -> Vec<Interval<U>> {
        self.0
    }

    /// Returns a slice of the intervals.
    pub fn as_slice(&self) -> &[Interval<U>] {
        &self.0
    }

    /// Returns the intervals as raw `(start, end)` pairs.
    pub fn to_pairs(&self) -> Vec<(f64, f64)> {
        self.0
            .iter()
            .map(|iv| (iv.start().value(), iv.end().value()))
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Set operations
// ─────────────────────────────────────────────────────────────────────

impl<U: Unit> IntervalSet<U> {
    /// Merges intervals where one ends exactly where the next starts.
    pub fn join_touching(&self) -> IntervalSet<U> {
        Self::from_sorted_unchecked(operations::join_touching(&self.0))
    }

    /// Returns the time ranges covered by both `self` and `other`.
    pub fn intersect(&self, other: &IntervalSet<U>) -> IntervalSet<U> {
        Self::from_sorted_unchecked(operations::compute_intersection(&self.0, &other.0))
    }

    /// Intersects any number of sets by left-folding pairwise intersection.
    ///
    /// Returns an empty set when `sets` is empty.
    pub fn intersect_all<'a, I>(sets: I) -> IntervalSet<U>
    where
        I: IntoIterator<Item = &'a IntervalSet<U>>,
        U: 'a,
    {
        let slices: Vec<&[Interval<U>]> = sets.into_iter().map(|s| s.as_slice()).collect();
        Self::from_sorted_unchecked(operations::compute_intersection_all(&slices))
    }

    /// Returns the time ranges covered by either `self` or `other`.
    pub fn union(&self, other: &IntervalSet<U>) -> IntervalSet<U> {
        Self::from_sorted_unchecked(operations::compute_union(&self.0, &other.0))
    }

    /// Returns the gaps of `self` between `range_start` and `range_end`.
    ///
    /// Missing bounds default to the start of the first interval and the end
    /// of the last one.
    ///
    /// # Errors
    ///
    /// [`GtiError::EmptyIntervalSet`] if the set is empty and either bound
    /// is missing.
    pub fn complement(
        &self,
        range_start: Option<Quantity<U>>,
        range_end: Option<Quantity<U>>,
    ) -> Result<IntervalSet<U>, GtiError> {
        let span = self.span();
        let start = range_start
            .or(span.map(|s| s.start()))
            .ok_or(GtiError::EmptyIntervalSet)?;
        let end = range_end
            .or(span.map(|s| s.end()))
            .ok_or(GtiError::EmptyIntervalSet)?;
        if start.value() > end.value() {
            return Ok(Self::new());
        }
        Ok(Self::from_sorted_unchecked(operations::compute_complement(
            &self.0,
            Interval::new(start, end),
        )))
    }

    /// Keeps only the intervals lasting at least `min_duration`.
    pub fn with_min_duration(&self, min_duration: Quantity<U>) -> IntervalSet<U> {
        Self::from_sorted_unchecked(
            self.0
                .iter()
                .filter(|iv| iv.duration().value() >= min_duration.value())
                .copied()
                .collect(),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────
// Transparent read access
// ─────────────────────────────────────────────────────────────────────

impl<U: Unit> Deref for IntervalSet<U> {
    type Target = [Interval<U>];

    fn deref(&self) -> &[Interval<U>] {
        &self.0
    }
}

impl<U: Unit> AsRef<[Interval<U>]> for IntervalSet<U> {
    fn as_ref(&self) -> &[Interval<U>] {
        &self.0
    }
}

impl<U: Unit> Index<usize> for IntervalSet<U> {
    type Output = Interval<U>;

    fn index(&self, index: usize) -> &Interval<U> {
        &self.0[index]
    }
}

// ─────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────

impl<U: Unit> TryFrom<Vec<Interval<U>>> for IntervalSet<U> {
    type Error = GtiError;

    fn try_from(vec: Vec<Interval<U>>) -> Result<Self, Self::Error> {
        Self::try_from_vec(vec)
    }
}

impl<U: Unit> From<Interval<U>> for IntervalSet<U> {
    /// Creates a single-element `IntervalSet` (always valid).
    fn from(interval: Interval<U>) -> Self {
        Self(vec![interval])
    }
}

// ─────────────────────────────────────────────────────────────────────
// Iterators
// ─────────────────────────────────────────────────────────────────────

impl<U: Unit> IntoIterator for IntervalSet<U> {
    type Item = Interval<U>;
    type IntoIter = std::vec::IntoIter<Interval<U>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, U: Unit> IntoIterator for &'a IntervalSet<U> {
    type Item = &'a Interval<U>;
    type IntoIter = std::slice::Iter<'a, Interval<U>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Trait impls
// ─────────────────────────────────────────────────────────────────────

impl<U: Unit> Default for IntervalSet<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Unit> Display for IntervalSet<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, interval) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", interval)?;
        }
        write!(f, "}}")
    }
}

/// Enables `assert_eq!(interval_set, vec![...])` in tests.
impl<U: Unit> PartialEq<Vec<Interval<U>>> for IntervalSet<U> {
    fn eq(&self, other: &Vec<Interval<U>>) -> bool {
        self.0 == *other
    }
}

// ─────────────────────────────────────────────────────────────────────
// Serde support
// ─────────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl<U: Unit> serde::Serialize for IntervalSet<U> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, U: Unit> serde::Deserialize<'de> for IntervalSet<U> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let vec = Vec::<Interval<U>>::deserialize(deserializer)?;
        Self::try_from_vec(vec).map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
