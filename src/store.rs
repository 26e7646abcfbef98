//! Synchronized owner of all display state.
//!
//! Poller, ticker, and scroll animator each hold a cloned handle and mutate
//! through it; the renderer reads via `snapshot()` so it never holds the lock
//! across serial I/O and never observes a half-written widget.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::widget::Widget;

/// One consistent read of the store: cloned widgets plus the counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub artist: Widget,
    pub title: Widget,
    pub remaining_seconds: i64,
}

#[derive(Debug)]
struct DisplayState {
    artist: Widget,
    title: Widget,
    remaining_seconds: i64,
}

/// Clonable handle over the shared display state; one per task.
#[derive(Clone)]
pub struct DisplayStore {
    inner: Arc<Mutex<DisplayState>>,
}

impl DisplayStore {
    pub fn new(artist: Widget, title: Widget) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DisplayState {
                artist,
                title,
                remaining_seconds: 0,
            })),
        }
    }

    // A task that panicked while holding the lock must not wedge the
    // remaining loops, so poisoning is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Feed fresh poll data in. Each widget compares against its logical
    /// content, so identical text never disturbs an in-progress scroll.
    pub fn update_track(&self, artist: &str, title: &str) {
        let mut state = self.lock();
        state.artist.set_content(artist);
        state.title.set_content(title);
    }

    pub fn set_remaining(&self, seconds: i64) {
        self.lock().remaining_seconds = seconds;
    }

    /// Count one second down. May go negative; formatting clamps to zero.
    pub fn tick(&self) {
        self.lock().remaining_seconds -= 1;
    }

    pub fn advance_scrolls(&self) {
        let mut state = self.lock();
        state.artist.advance_scroll();
        state.title.advance_scroll();
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            artist: state.artist.clone(),
            title: state.title.clone(),
            remaining_seconds: state.remaining_seconds,
        }
    }
}
