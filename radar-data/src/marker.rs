#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle line emitted by the scanning device instead of a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatusMarker {
    /// The device started sweeping
    ScanStart,
    /// The device stopped sweeping
    ScanStop,
    /// Periodic heartbeat sent while the device is powered
    DeviceReady,
}
