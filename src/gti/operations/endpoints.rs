use crate::gti::Interval;
use qtty::Unit;

/// Which side of an interval an endpoint bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Edge {
    Open,
    Close,
}

/// An interval boundary tagged with the set it came from.
#[derive(Debug, Clone, Copy)]
pub(super) struct Endpoint {
    pub time: f64,
    pub edge: Edge,
    pub source: usize,
}

/// Flattens `intervals` into tagged start/stop endpoints.
pub(super) fn tag<U: Unit>(intervals: &[Interval<U>], source: usize) -> Vec<Endpoint> {
    intervals
        .iter()
        .flat_map(|iv| {
            [
                Endpoint {
                    time: iv.start().value(),
                    edge: Edge::Open,
                    source,
                },
                Endpoint {
                    time: iv.end().value(),
                    edge: Edge::Close,
                    source,
                },
            ]
        })
        .collect()
}

/// Sorts endpoints by time; at equal times `first` edges come before the other kind.
pub(super) fn sort_by_time(endpoints: &mut [Endpoint], first: Edge) {
    endpoints.sort_by(|a, b| {
        a.time
            .partial_cmp(&b.time)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let rank = |e: Edge| if e == first { 0 } else { 1 };
                rank(a.edge).cmp(&rank(b.edge))
            })
    });
}
