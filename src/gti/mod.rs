//! Good-time-interval (GTI) algebra.
//!
//! An [`IntervalSet`] is a validated, sorted list of non-overlapping closed
//! intervals. Sets are combined with [`IntervalSet::intersect`],
//! [`IntervalSet::union`] and [`IntervalSet::complement`]; each operation
//! returns a new set that again satisfies the invariant.

mod chunks;
mod error;
mod interval;
mod interval_set;
pub mod operations;
mod threshold;

pub use chunks::CHUNK_EPSILON;
pub use error::GtiError;
pub use interval::Interval;
pub use interval_set::IntervalSet;
