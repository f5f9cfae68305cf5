use std::io;

pub type Result<T> = std::result::Result<T, RadarError>;

#[derive(Debug, thiserror::Error)]
pub enum RadarError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Transport has already been closed")]
    TransportClosed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to spawn acquisition thread: {0}")]
    Spawn(io::Error),
}
