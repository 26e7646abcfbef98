use std::io::Write;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{protocol, Error, Result};

/// Final message pushed across the full display on the way out.
pub(super) const FAREWELL: &str = "        Bye!        ";

/// Install a ctrl-c handler that flips the shared running flag instead of exiting immediately.
pub(super) fn create_shutdown_flag() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let running_handle = running.clone();

    ctrlc::set_handler(move || {
        running_handle.store(false, Ordering::SeqCst);
    })
    .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;

    Ok(running)
}

/// Best-effort farewell write. The process is exiting and the transport may
/// already be dead, so failures are ignored.
pub(super) fn write_farewell<W: Write>(sink: &mut W) {
    let _ = protocol::write_text(sink, FAREWELL, 1, protocol::DISPLAY_COLS, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::fake::FakeSerialPort;

    #[test]
    fn farewell_writes_full_width() {
        let mut fake = FakeSerialPort::new();
        write_farewell(&mut fake);
        let written = fake.written();
        assert!(written.starts_with(&[0x04, 0x01, b'C', 49, 88, 0x17]));
        assert!(written.ends_with(FAREWELL.as_bytes()));
    }

    #[test]
    fn farewell_swallows_transport_failure() {
        let mut fake = FakeSerialPort::failing();
        write_farewell(&mut fake);
    }
}
