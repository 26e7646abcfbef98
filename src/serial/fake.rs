use std::io::{self, Write};

/// Byte-capturing stand-in for the serial link, used by render tests.
#[derive(Debug, Default)]
pub struct FakeSerialPort {
    written: Vec<u8>,
    fail_writes: bool,
}

impl FakeSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// A port whose every write fails, for the log-and-continue path.
    pub fn failing() -> Self {
        Self {
            written: Vec::new(),
            fail_writes: true,
        }
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Drain captured bytes so the next assertion starts clean.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }
}

impl Write for FakeSerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "fake serial failure",
            ));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_writes_in_order() {
        let mut fake = FakeSerialPort::new();
        fake.write_all(&[0x04, 0x01]).unwrap();
        fake.write_all(b"hi").unwrap();
        assert_eq!(fake.written(), &[0x04, 0x01, b'h', b'i']);
        assert_eq!(fake.take_written(), vec![0x04, 0x01, b'h', b'i']);
        assert!(fake.written().is_empty());
    }

    #[test]
    fn failing_port_errors_on_write() {
        let mut fake = FakeSerialPort::failing();
        assert!(fake.write_all(b"x").is_err());
    }
}
