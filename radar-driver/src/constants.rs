pub(crate) const DEFAULT_FADE_TIME_SECS: f64 = 3.0;
pub(crate) const DEFAULT_MAX_DISTANCE: f64 = 120.0;
pub(crate) const DEFAULT_RENDER_INTERVAL_MS: u64 = 100;
pub(crate) const DEFAULT_READ_TIMEOUT_MS: u64 = 20;
pub(crate) const DEFAULT_BAUD_RATE: u32 = 115200;
pub(crate) const DEFAULT_SNAPSHOT_QUEUE: usize = 8;
pub(crate) const MAX_SNAPSHOT_QUEUE: usize = 1024;
pub(crate) const COMMAND_QUEUE: usize = 10;
pub(crate) const MARKER_QUEUE: usize = 16;
// Longest line the device ever sends is well under this.
pub(crate) const MAX_LINE_BYTES: usize = 256;
pub(crate) const READ_CHUNK_SIZE: usize = 256;
pub(crate) const MARKER_SCAN_START: &str = "Radar Start";
pub(crate) const MARKER_SCAN_STOP: &str = "Radar Stop";
pub(crate) const MARKER_DEVICE_READY: &str = "System Ready";
