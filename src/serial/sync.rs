use std::io::{self, Write};
use std::time::Duration;

use serialport::FlowControl;

use crate::{Error, Result};

/// Serial link to the display. The DSP-420 is write-only; nothing is ever
/// read back, so only `io::Write` is exposed.
pub struct SerialPort {
    device: String,
    port: Box<dyn serialport::SerialPort>,
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl SerialPort {
    /// Open `device` at `baud`, 8N1 with flow control off (the reference
    /// device has no handshake lines).
    pub fn connect(device: &str, baud: u32, timeout_ms: u64) -> Result<Self> {
        if device.is_empty() {
            return Err(Error::InvalidArgs(
                "device path cannot be empty".to_string(),
            ));
        }

        let port = serialport::new(device, baud)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(timeout_ms))
            .open()
            .map_err(map_serial_error)?;

        Ok(Self {
            device: device.to_string(),
            port,
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl Write for SerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

fn map_serial_error(err: serialport::Error) -> Error {
    use serialport::ErrorKind;

    let kind = match err.kind() {
        ErrorKind::NoDevice => io::ErrorKind::NotFound,
        ErrorKind::InvalidInput => io::ErrorKind::InvalidInput,
        ErrorKind::Io(inner) => inner,
        ErrorKind::Unknown => io::ErrorKind::Other,
    };

    Error::Io(io::Error::new(kind, err))
}
