#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Angular position of the sweep in whole degrees, always within `0..=180`.
///
/// One slot per degree, so the value doubles as an index into the sample table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct Angle(u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Angle must be within 0..={max} degrees. Actually {0}.", max = Angle::MAX_DEGREES)]
pub struct AngleOutOfRange(pub u8);

impl Angle {
    pub const MAX_DEGREES: u8 = 180;
    /// Number of distinct angles, i.e. slots in a sample table.
    pub const COUNT: usize = Angle::MAX_DEGREES as usize + 1;

    pub fn new(degrees: u8) -> Option<Angle> {
        (degrees <= Angle::MAX_DEGREES).then_some(Angle(degrees))
    }

    pub fn degrees(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn radians(self) -> f64 {
        (self.0 as f64).to_radians()
    }

    /// Every angle from 0 to 180 in ascending order.
    pub fn all() -> impl Iterator<Item = Angle> {
        (0..=Angle::MAX_DEGREES).map(Angle)
    }
}

impl TryFrom<u8> for Angle {
    type Error = AngleOutOfRange;

    fn try_from(degrees: u8) -> Result<Self, Self::Error> {
        Angle::new(degrees).ok_or(AngleOutOfRange(degrees))
    }
}

impl From<Angle> for u8 {
    fn from(angle: Angle) -> u8 {
        angle.0
    }
}
