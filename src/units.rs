//! Typed quantities used across the crate.
//!
//! Time stamps and interval bounds are [`Seconds`]; sky coordinates are
//! [`Degrees`]. Inputs recorded in another unit of the same dimension (an
//! hour-angle right ascension, a light curve tagged in hours) go through
//! [`convert`], which only compiles when both units share a dimension.

use qtty::{Quantity, Unit};

pub use qtty::{Degree, Degrees, Second, Seconds};

/// Marker trait for units that share the same physical dimension.
///
/// Automatically implemented for any pair of units where `From::Dim == To::Dim`.
pub trait SameDim<To: Unit>: Unit<Dim = To::Dim> {}

impl<From, To> SameDim<To> for From
where
    From: Unit,
    To: Unit<Dim = From::Dim>,
{
}

/// Converts a quantity from one unit to another unit of the same dimension.
///
/// ```
/// use allsky::units::{convert, Degree};
/// use qtty::{HourAngle, Quantity};
///
/// let ra: Quantity<Degree> = convert(Quantity::<HourAngle>::new(6.0));
/// assert!((ra.value() - 90.0).abs() < 1e-12);
/// ```
#[inline]
pub fn convert<From, To>(q: Quantity<From>) -> Quantity<To>
where
    From: SameDim<To>,
    To: Unit,
{
    q.to::<To>()
}
