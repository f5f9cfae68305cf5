use crate::angle::Angle;
use crate::stats::ScanStats;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Most recent detection at one angle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisiblePoint {
    pub angle: Angle,
    /// Distance to the object, in the unit the device reports (cm for the micro:bit radar).
    pub distance: f64,
}

impl VisiblePoint {
    /// Position on the plane with 0 degrees along +x and 90 degrees along +y.
    pub fn to_cartesian(&self) -> (f64, f64) {
        let theta = self.angle.radians();
        (self.distance * theta.cos(), self.distance * theta.sin())
    }
}

/// Struct to hold one render-ready view of the radar.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Time since acquisition started at which the view was taken.
    pub timestamp: Duration,
    /// Detections that have not faded yet, ordered by angle.
    pub visible_points: Vec<VisiblePoint>,
    /// Where the sensor last pointed, regardless of whether that reading has faded.
    pub sweep_angle: Option<Angle>,
    pub stats: ScanStats,
}

impl Snapshot {
    pub fn distance_at(&self, angle: Angle) -> Option<f64> {
        self.visible_points
            .iter()
            .find(|p| p.angle == angle)
            .map(|p| p.distance)
    }
}
