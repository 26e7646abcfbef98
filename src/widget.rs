//! One addressable text field on the display.

/// Scroll state of a field. Idle fields render centered and never advance;
/// scrolling fields carry a 1-based cursor into the padded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    Idle,
    Scrolling { cursor: usize },
}

/// A fixed-position field with its own scroll state. `display_start` and
/// `display_length` are 1-based device columns, fixed for the widget's life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    content: String,
    source: String,
    display_start: u8,
    display_length: u8,
    mode: ScrollMode,
}

impl Widget {
    pub fn new(display_start: u8, display_length: u8) -> Self {
        Self {
            content: String::new(),
            source: String::new(),
            display_start,
            display_length,
            mode: ScrollMode::Idle,
        }
    }

    pub fn display_start(&self) -> u8 {
        self.display_start
    }

    pub fn display_length(&self) -> u8 {
        self.display_length
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    pub fn is_scrolling(&self) -> bool {
        matches!(self.mode, ScrollMode::Scrolling { .. })
    }

    pub fn scroll_cursor(&self) -> usize {
        match self.mode {
            ScrollMode::Idle => 1,
            ScrollMode::Scrolling { cursor } => cursor,
        }
    }

    /// Replace the field text. The comparison is against the pre-padding
    /// source, so an unchanged poll never resets an in-progress scroll.
    pub fn set_content(&mut self, new_text: &str) {
        if new_text == self.source {
            return;
        }
        self.source = new_text.to_string();
        if new_text.chars().count() > self.display_length as usize {
            // Two spaces either side keep the restart point readable.
            self.content = format!("  {new_text}  ");
            self.mode = ScrollMode::Scrolling { cursor: 1 };
        } else {
            self.content = new_text.to_string();
            self.mode = ScrollMode::Idle;
        }
    }

    /// Move the scroll cursor one column, restarting at 1 once the remaining
    /// tail no longer fills the field.
    pub fn advance_scroll(&mut self) {
        let ScrollMode::Scrolling { cursor } = self.mode else {
            return;
        };
        let next = cursor + 1;
        let remaining = self.content.chars().count() - (next - 1);
        self.mode = if remaining < self.display_length as usize {
            ScrollMode::Scrolling { cursor: 1 }
        } else {
            ScrollMode::Scrolling { cursor: next }
        };
    }

    /// Tail of the content from the scroll cursor onwards. The encoder
    /// truncates it to the field width at write time.
    pub fn visible_slice(&self) -> String {
        self.content.chars().skip(self.scroll_cursor() - 1).collect()
    }
}
