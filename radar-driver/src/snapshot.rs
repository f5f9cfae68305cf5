use crate::buffer::SampleBuffer;
use crate::sweep::SweepTracker;
use radar_data::{ScanStats, Snapshot};
use std::time::Duration;

pub(crate) trait RadarSnapshot {
    fn build(
        buffer: &mut SampleBuffer,
        sweep: &SweepTracker,
        now: Duration,
        stats: ScanStats,
    ) -> Snapshot;
}

impl RadarSnapshot for Snapshot {
    /// Applies decay and reads the visible points with the same `now`, so a
    /// reading cannot expire between the two steps.
    fn build(
        buffer: &mut SampleBuffer,
        sweep: &SweepTracker,
        now: Duration,
        stats: ScanStats,
    ) -> Snapshot {
        buffer.decay(now);
        Snapshot {
            timestamp: now,
            visible_points: buffer.visible_points(now),
            sweep_angle: sweep.current_angle(),
            stats,
        }
    }
}
