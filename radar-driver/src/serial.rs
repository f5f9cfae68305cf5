use crate::constants::READ_CHUNK_SIZE;
use crate::error::{RadarError, Result};
use crate::transport::Transport;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read};
use std::time::Duration;

/// Line-oriented serial link to the scanning device (8N1, no flow control).
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Opens `port_name`, e.g. `/dev/ttyACM0`, and drops anything already queued
    /// so the first line read is not a fragment.
    pub fn open(port_name: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(read_timeout)
            .open()?;
        log::info!("Opened serial port {} at {} baud", port_name, baud_rate);
        SerialTransport::from_port(port)
    }

    pub fn from_port(mut port: Box<dyn SerialPort>) -> Result<Self> {
        flush(&mut port)?;
        Ok(SerialTransport { port: Some(port) })
    }
}

impl Transport for SerialTransport {
    fn read_available(&mut self) -> Result<Option<Vec<u8>>> {
        let port = self.port.as_mut().ok_or(RadarError::TransportClosed)?;
        let n_read = get_n_read(port)?;
        // Nothing queued: block for at most the port timeout
        let mut packet: Vec<u8> = vec![0; n_read.clamp(1, READ_CHUNK_SIZE)];
        match port.read(packet.as_mut_slice()) {
            Ok(0) => Ok(None),
            Ok(n) => {
                packet.truncate(n);
                Ok(Some(packet))
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(RadarError::Io(e)),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self.port.take() {
            Some(port) => {
                log::info!(
                    "Closing serial port {}",
                    port.name().unwrap_or_else(|| "<unnamed>".to_string())
                );
                Ok(())
            }
            None => Err(RadarError::TransportClosed),
        }
    }
}

pub(crate) fn get_n_read(port: &mut Box<dyn SerialPort>) -> Result<usize> {
    let n_u32: u32 = port.bytes_to_read()?;
    Ok(n_u32.try_into().unwrap_or(0))
}

pub(crate) fn flush(port: &mut Box<dyn SerialPort>) -> Result<()> {
    let n_read: usize = get_n_read(port).unwrap_or(0);
    if n_read == 0 {
        return Ok(());
    }
    let mut packet: Vec<u8> = vec![0; n_read];
    port.read_exact(packet.as_mut_slice())?;
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::time::sleep_ms;
    use serialport::TTYPort;
    use std::io::Write;

    fn slave_transport(slave: TTYPort) -> SerialTransport {
        let mut slave_ptr = Box::new(slave) as Box<dyn SerialPort>;
        slave_ptr.set_timeout(Duration::from_millis(20)).unwrap();
        SerialTransport::from_port(slave_ptr).unwrap()
    }

    #[test]
    fn test_flush() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        master.write_all(b"half a li").unwrap();

        let mut slave_ptr = Box::new(slave) as Box<dyn SerialPort>;

        sleep_ms(10);

        assert_eq!(slave_ptr.bytes_to_read().unwrap(), 9);
        flush(&mut slave_ptr).unwrap();
        assert_eq!(slave_ptr.bytes_to_read().unwrap(), 0);

        // when zero bytes to read
        flush(&mut slave_ptr).unwrap();
        assert_eq!(slave_ptr.bytes_to_read().unwrap(), 0);
    }

    #[test]
    fn test_open_discards_stale_input() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        master.write_all(b"0,12\n").unwrap();
        sleep_ms(10);

        let mut transport = slave_transport(slave);
        assert_eq!(transport.read_available().unwrap(), None);
    }

    #[test]
    fn test_read_available() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        let mut transport = slave_transport(slave);

        assert_eq!(transport.read_available().unwrap(), None);

        master.write_all(b"90,45.5\n").unwrap();
        sleep_ms(10);
        let mut received = Vec::new();
        while let Some(chunk) = transport.read_available().unwrap() {
            received.extend(chunk);
        }
        assert_eq!(received, b"90,45.5\n");
    }

    #[test]
    fn test_close() {
        let (_master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        let mut transport = slave_transport(slave);
        transport.close().unwrap();
        assert!(matches!(
            transport.read_available(),
            Err(RadarError::TransportClosed)
        ));
        assert!(matches!(transport.close(), Err(RadarError::TransportClosed)));
    }
}
