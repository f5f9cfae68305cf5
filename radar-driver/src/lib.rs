mod buffer;
mod config;
mod constants;
mod driver_threads;
mod error;
mod line;
mod numeric;
mod serial;
mod snapshot;
mod sweep;
#[cfg(test)]
mod time;
mod transport;

pub use crate::buffer::{Sample, SampleBuffer};
pub use crate::config::DriverConfig;
pub use crate::driver_threads::{join, AcquisitionLoop, Command, DriverThread, LoopState, RadarFeed};
pub use crate::error::{RadarError, Result};
pub use crate::line::{parse_line, LineParser, ParsedEvent};
pub use crate::serial::SerialTransport;
pub use crate::sweep::SweepTracker;
pub use crate::transport::Transport;
pub use radar_data::{Angle, ScanStats, Snapshot, StatusMarker, VisiblePoint};

/// Runs the acquisition loop over an already open transport on its own thread.
pub fn spawn_driver(
    transport: Box<dyn Transport>,
    config: &DriverConfig,
) -> Result<(DriverThread, RadarFeed)> {
    let (acquisition, command_tx, feed) = AcquisitionLoop::new(transport, config)?;
    let acquisition_thread = std::thread::Builder::new()
        .name("radar-acquisition".to_string())
        .spawn(move || acquisition.run())
        .map_err(RadarError::Spawn)?;

    let driver_thread = DriverThread {
        command_tx,
        acquisition_thread: Some(acquisition_thread),
    };
    Ok((driver_thread, feed))
}

/// Function to launch the radar.
/// # Arguments
///
/// * `port_name` - Serial port name such as `/dev/ttyACM0`.
/// * `config` - Driver settings. Failing to open the port is reported here,
///   nothing after that is fatal.
pub fn run_driver(port_name: &str, config: &DriverConfig) -> Result<(DriverThread, RadarFeed)> {
    config.validate()?;
    let transport = SerialTransport::open(port_name, config.baud_rate, config.read_timeout())?;
    spawn_driver(Box::new(transport), config)
}
