//! A single good-time interval.

use std::fmt::Display;

use qtty::{Quantity, Unit};

use super::error::GtiError;

/// Closed range `[start, end]` on a time-like axis.
///
/// Two intervals that share only an endpoint *touch*; they do not overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<U: Unit> {
    start: Quantity<U>,
    end: Quantity<U>,
}

impl<U: Unit> Interval<U> {
    /// Creates interval `[start, end]`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`. Use [`Interval::try_new`] for untrusted input.
    pub const fn new(start: Quantity<U>, end: Quantity<U>) -> Self {
        assert!(
            start.value() <= end.value(),
            "Interval start must be <= end"
        );
        Self { start, end }
    }

    /// Creates interval `[start, end]`, rejecting reversed or NaN bounds.
    pub fn try_new(start: Quantity<U>, end: Quantity<U>) -> Result<Self, GtiError> {
        if start.value().is_nan() || end.value().is_nan() {
            return Err(GtiError::MalformedIntervals {
                index: 0,
                reason: "bound is NaN".to_string(),
            });
        }
        if start.value() > end.value() {
            return Err(GtiError::MalformedIntervals {
                index: 0,
                reason: format!("start {} is after end {}", start.value(), end.value()),
            });
        }
        Ok(Self { start, end })
    }

    pub const fn from_f64(start: f64, end: f64) -> Self {
        Self::new(Quantity::<U>::new(start), Quantity::<U>::new(end))
    }

    pub const fn start(&self) -> Quantity<U> {
        self.start
    }

    pub const fn end(&self) -> Quantity<U> {
        self.end
    }

    pub fn duration(&self) -> Quantity<U> {
        self.end - self.start
    }

    /// Returns true if `position` ∈ `[start, end]`.
    pub const fn contains(&self, position: Quantity<U>) -> bool {
        self.start.value() <= position.value() && position.value() <= self.end.value()
    }

    /// Returns true if one interval ends exactly where the other starts.
    pub const fn touches(&self, other: &Interval<U>) -> bool {
        self.end.value() == other.start.value() || other.end.value() == self.start.value()
    }
}

impl<U: Unit> Display for Interval<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.start.value(), self.end.value())
    }
}

// =============================================================================
// Interval Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<U: Unit> serde::Serialize for Interval<U> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut s = serializer.serialize_tuple(2)?;
        s.serialize_element(&self.start.value())?;
        s.serialize_element(&self.end.value())?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, U: Unit> serde::Deserialize<'de> for Interval<U> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (start, end) = <(f64, f64)>::deserialize(deserializer)?;
        Self::try_new(Quantity::<U>::new(start), Quantity::<U>::new(end))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::Second;

    #[test]
    fn test_interval_creation() {
        let interval = Interval::new(Quantity::<Second>::new(0.0), Quantity::<Second>::new(100.0));
        assert_eq!(interval.duration().value(), 100.0);
        assert_eq!(interval.start().value(), 0.0);
        assert_eq!(interval.end().value(), 100.0);
    }

    #[test]
    fn test_try_new_rejects_reversed_bounds() {
        let result = Interval::try_new(Quantity::<Second>::new(5.0), Quantity::<Second>::new(1.0));
        assert!(matches!(result, Err(GtiError::MalformedIntervals { .. })));
    }

    #[test]
    fn test_try_new_rejects_nan() {
        let result = Interval::try_new(
            Quantity::<Second>::new(f64::NAN),
            Quantity::<Second>::new(1.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_try_new_accepts_zero_length() {
        let interval =
            Interval::try_new(Quantity::<Second>::new(3.0), Quantity::<Second>::new(3.0)).unwrap();
        assert_eq!(interval.duration().value(), 0.0);
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::<Second>::from_f64(0.0, 100.0);
        assert!(interval.contains(Quantity::new(50.0)));
        assert!(interval.contains(Quantity::new(0.0)));
        assert!(interval.contains(Quantity::new(100.0)));
        assert!(!interval.contains(Quantity::new(150.0)));
    }

    #[test]
    fn test_touching_is_symmetric() {
        let a = Interval::<Second>::from_f64(0.0, 50.0);
        let b = Interval::<Second>::from_f64(50.0, 100.0);
        let c = Interval::<Second>::from_f64(60.0, 100.0);
        assert!(a.touches(&b));
        assert!(b.touches(&a));
        assert!(!a.touches(&c));
    }
}
