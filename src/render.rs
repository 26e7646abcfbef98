//! Render-pass helpers: formatting, centering, and per-field delta tracking.
//!
//! The render loop calls these once per pass; everything here is pure over
//! its inputs except for the bytes pushed into the sink.

use std::io::Write;

use crc32fast::Hasher;

use crate::{config::TIME_FIELD_LEN, protocol, widget::Widget, Result};

/// Left-biased centering: `(length - len)/2` leading spaces, no trailing pad
/// (the pre-clear blanks the rest of the field).
pub fn center(text: &str, length: usize) -> String {
    let count = text.chars().count();
    if count >= length {
        return text.to_string();
    }
    let lpad = (length - count) / 2;
    format!("{}{}", " ".repeat(lpad), text)
}

/// `MM:SS` from a second count. Total: negative values clamp to `00:00`.
pub fn format_time(seconds: i64) -> String {
    let secs = seconds.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn checksum(raw: &str) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(raw.as_bytes());
    hasher.finalize()
}

/// What was last pushed to the device for one field. A field is rewritten
/// only when its content checksum or scroll cursor moves.
#[derive(Debug, Default)]
pub struct FieldBuffer {
    last_checksum: Option<u32>,
    last_cursor: usize,
}

impl FieldBuffer {
    fn is_current(&self, content: &str, cursor: usize) -> bool {
        self.last_checksum == Some(checksum(content)) && self.last_cursor == cursor
    }

    fn mark(&mut self, content: &str, cursor: usize) {
        self.last_checksum = Some(checksum(content));
        self.last_cursor = cursor;
    }
}

/// One render pass over a track field (artist or title).
///
/// Unchanged idle fields write nothing. A content change writes the centered
/// form (fits) or the padded form from cursor 1 (overlong); a cursor move on
/// a scrolling field rewrites the current visible slice.
pub fn render_track_field<W: Write>(
    sink: &mut W,
    widget: &Widget,
    buffer: &mut FieldBuffer,
) -> Result<()> {
    let cursor = widget.scroll_cursor();
    if buffer.is_current(widget.content(), cursor) {
        return Ok(());
    }

    let min = widget.display_start();
    let max = min + widget.display_length() - 1;
    let payload = if widget.is_scrolling() {
        widget.visible_slice()
    } else {
        center(widget.content(), widget.display_length() as usize)
    };
    protocol::write_text(sink, &payload, min, max, true)?;
    buffer.mark(widget.content(), cursor);
    Ok(())
}

/// One render pass over the remaining-time field. Writes only when the
/// formatted `MM:SS` string changes, on the non-clearing device path.
pub fn render_time_field<W: Write>(
    sink: &mut W,
    remaining_seconds: i64,
    time_start: u8,
    buffer: &mut FieldBuffer,
) -> Result<()> {
    let payload = format!("{}| ", format_time(remaining_seconds));
    if buffer.is_current(&payload, 1) {
        return Ok(());
    }

    let max = time_start + TIME_FIELD_LEN - 1;
    protocol::write_text(sink, &payload, time_start, max, false)?;
    buffer.mark(&payload, 1);
    Ok(())
}
