//! Byte-level encoder for the DSP-420 control protocol.
//!
//! The device understands two framed commands (clear a column range, move the
//! cursor) plus raw ASCII writes at the current cursor. Frames are
//! `0x04 0x01 <cmd> <args...> 0x17`, with positions encoded as single bytes
//! offset by 48. No acknowledgement ever comes back.

use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::{Error, Result};

/// Total addressable columns on the reference device.
pub const DISPLAY_COLS: u8 = 40;

const FRAME_PROLOGUE: [u8; 2] = [0x04, 0x01];
const FRAME_EPILOGUE: u8 = 0x17;

/// The device garbles text written immediately after a bare cursor move, so
/// the non-clearing write path waits this long before sending the payload.
const CURSOR_SETTLE: Duration = Duration::from_millis(100);

fn enc(pos: u8) -> Result<u8> {
    if !(1..=DISPLAY_COLS).contains(&pos) {
        return Err(Error::InvalidArgs(format!(
            "position {pos} outside 1..={DISPLAY_COLS}"
        )));
    }
    Ok(pos + 48)
}

/// Blank columns `start..=end`.
pub fn clear<W: Write>(sink: &mut W, start: u8, end: u8) -> Result<()> {
    if end < start {
        return Err(Error::InvalidArgs(format!(
            "clear range inverted: {start}..{end}"
        )));
    }
    let frame = [
        FRAME_PROLOGUE[0],
        FRAME_PROLOGUE[1],
        b'C',
        enc(start)?,
        enc(end)?,
        FRAME_EPILOGUE,
    ];
    sink.write_all(&frame)?;
    Ok(())
}

/// Move the cursor to `pos`.
pub fn set_cursor<W: Write>(sink: &mut W, pos: u8) -> Result<()> {
    let frame = [
        FRAME_PROLOGUE[0],
        FRAME_PROLOGUE[1],
        b'P',
        enc(pos)?,
        FRAME_EPILOGUE,
    ];
    sink.write_all(&frame)?;
    Ok(())
}

/// Write `text` into columns `min..=max`, truncating to the range width.
///
/// With `pre_clear` the range is blanked first; without it the settle delay
/// is inserted between positioning and writing instead.
pub fn write_text<W: Write>(
    sink: &mut W,
    text: &str,
    min: u8,
    max: u8,
    pre_clear: bool,
) -> Result<()> {
    if max < min {
        return Err(Error::InvalidArgs(format!(
            "write range inverted: {min}..{max}"
        )));
    }
    let width = (max - min + 1) as usize;
    let truncated: String = text.chars().take(width).collect();

    if pre_clear {
        clear(sink, min, max)?;
    }
    set_cursor(sink, min)?;
    if !pre_clear {
        thread::sleep(CURSOR_SETTLE);
    }
    sink.write_all(truncated.as_bytes())?;
    sink.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_emits_control_frame() {
        let mut sink = Vec::new();
        clear(&mut sink, 1, 40).unwrap();
        assert_eq!(sink, [0x04, 0x01, b'C', 49, 88, 0x17]);
    }

    #[test]
    fn set_cursor_emits_control_frame() {
        let mut sink = Vec::new();
        set_cursor(&mut sink, 21).unwrap();
        assert_eq!(sink, [0x04, 0x01, b'P', 21 + 48, 0x17]);
    }

    #[test]
    fn rejects_out_of_range_positions() {
        let mut sink = Vec::new();
        assert!(clear(&mut sink, 0, 10).is_err());
        assert!(clear(&mut sink, 1, 41).is_err());
        assert!(set_cursor(&mut sink, 0).is_err());
        assert!(sink.is_empty(), "no bytes may leak on a caller error");
    }

    #[test]
    fn rejects_inverted_ranges() {
        let mut sink = Vec::new();
        assert!(clear(&mut sink, 10, 5).is_err());
        assert!(write_text(&mut sink, "x", 10, 5, true).is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn write_text_clears_positions_and_writes() {
        let mut sink = Vec::new();
        write_text(&mut sink, "Help!", 1, 20, true).unwrap();
        let mut expected = vec![0x04, 0x01, b'C', 49, 68, 0x17];
        expected.extend_from_slice(&[0x04, 0x01, b'P', 49, 0x17]);
        expected.extend_from_slice(b"Help!");
        assert_eq!(sink, expected);
    }

    #[test]
    fn write_text_truncates_to_range_width() {
        let mut sink = Vec::new();
        write_text(&mut sink, "ABCDEFGH", 1, 4, true).unwrap();
        assert!(sink.ends_with(b"ABCD"));
        // clear frame + cursor frame + exactly 4 payload bytes
        assert_eq!(sink.len(), 6 + 5 + 4);
    }

    #[test]
    fn write_text_without_pre_clear_skips_clear_frame() {
        let mut sink = Vec::new();
        write_text(&mut sink, "02:05| ", 21, 27, false).unwrap();
        let mut expected = vec![0x04, 0x01, b'P', 21 + 48, 0x17];
        expected.extend_from_slice(b"02:05| ");
        assert_eq!(sink, expected);
    }
}
