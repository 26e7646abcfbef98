use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use super::Logger;
use crate::{
    render::{render_time_field, render_track_field, FieldBuffer},
    serial::errors::classify_io_error,
    store::DisplayStore,
    Error, Result,
};

/// The two pauses per cycle keep back-to-back writes from saturating the
/// device's receive buffer.
const HALF_PAUSE: Duration = Duration::from_millis(50);

/// Drive the display until shutdown: one track-field pass, a pause, one
/// time-field pass, a pause, repeat. Reads go through `snapshot()` so the
/// store lock is never held across serial writes.
pub(super) fn run_render_loop<W: Write>(
    sink: &mut W,
    store: &DisplayStore,
    time_start: u8,
    logger: &Logger,
    running: &AtomicBool,
) -> Result<()> {
    let mut artist_buffer = FieldBuffer::default();
    let mut title_buffer = FieldBuffer::default();
    let mut time_buffer = FieldBuffer::default();

    while running.load(Ordering::SeqCst) {
        let snapshot = store.snapshot();
        log_and_continue(
            logger,
            render_track_field(sink, &snapshot.artist, &mut artist_buffer),
        )?;
        log_and_continue(
            logger,
            render_track_field(sink, &snapshot.title, &mut title_buffer),
        )?;
        thread::sleep(HALF_PAUSE);

        // fresh read so ticks during the pause land this cycle
        let remaining = store.snapshot().remaining_seconds;
        log_and_continue(
            logger,
            render_time_field(sink, remaining, time_start, &mut time_buffer),
        )?;
        thread::sleep(HALF_PAUSE);
    }

    Ok(())
}

// Transport glitches are logged and the loop keeps going; the field is
// retried naturally on the next pass. Anything else is a bug and propagates.
fn log_and_continue(logger: &Logger, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(Error::Io(err)) => {
            logger.warn(format!(
                "serial write failed ({}): {err}",
                classify_io_error(&err)
            ));
            Ok(())
        }
        Err(other) => Err(other),
    }
}
