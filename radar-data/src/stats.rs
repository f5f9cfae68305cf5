#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanStats {
    /// Samples accepted since the driver started.
    pub total_received: u64,
    /// Time elapsed since the last accepted sample, `None` before the first one.
    pub since_last_sample: Option<Duration>,
    /// Non-empty lines that were neither a sample nor a marker.
    pub dropped_lines: u64,
    /// Transport reads that failed.
    pub read_errors: u64,
}
