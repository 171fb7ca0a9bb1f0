use crate::attitude::SkyPosition;
use crate::units::Seconds;

/// A sample's value tagged with where the instrument was pointing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub time: Seconds,
    pub value: f64,
    pub position: SkyPosition,
}
