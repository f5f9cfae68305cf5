pub mod angle;
pub mod marker;
pub mod snapshot;
pub mod stats;

pub use angle::{Angle, AngleOutOfRange};
pub use marker::StatusMarker;
pub use snapshot::{Snapshot, VisiblePoint};
pub use stats::ScanStats;
