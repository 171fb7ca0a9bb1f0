//! Nearest-index lookup on sorted time axes.
//!
//! Both sample filtering and attitude interpolation locate a query time by
//! finding the nearest sorted entry and then nudging the index by one towards
//! the side they need. [`nearest_index`] is the shared first step and
//! [`bracket`] adds the correction.

/// Which neighbour a nearest-index result should be corrected towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// First entry at or after the query (steps forward if the nearest is earlier).
    AtOrAfter,
    /// Last entry at or before the query (steps back if the nearest is later).
    AtOrBefore,
}

/// Index of the value in `sorted` closest to `value`.
///
/// Uses the insertion point from a binary search and compares the two
/// neighbours; on a tie the later one wins. Returns `None` for an empty slice.
pub fn nearest_index(sorted: &[f64], value: f64) -> Option<usize> {
    if sorted.is_empty() {
        return None;
    }
    let idx = sorted.partition_point(|&t| t < value);
    let nearest = if idx >= sorted.len() {
        sorted.len() - 1
    } else if idx == 0 {
        0
    } else if (value - sorted[idx - 1]).abs() < (value - sorted[idx]).abs() {
        idx - 1
    } else {
        idx
    };
    Some(nearest)
}

/// Nearest index, then moved one step towards `side` when the nearest entry
/// lies on the wrong side of `value` and a neighbour exists.
///
/// The result may still be on the wrong side at the ends of the slice;
/// callers decide how to treat that.
pub fn bracket(sorted: &[f64], value: f64, side: Side) -> Option<usize> {
    let idx = nearest_index(sorted, value)?;
    let corrected = match side {
        Side::AtOrAfter if sorted[idx] < value && idx + 1 < sorted.len() => idx + 1,
        Side::AtOrBefore if sorted[idx] > value && idx > 0 => idx - 1,
        _ => idx,
    };
    Some(corrected)
}
