//! Background loops: now-playing poller, countdown ticker, scroll animator.
//!
//! Each runs on its own named thread against a cloned store handle and exits
//! once the shared running flag drops. Sleeps are sliced so shutdown is
//! observed promptly even mid-interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::Logger;
use crate::nowplaying::{self, TrackInfo};
use crate::store::DisplayStore;

/// Per-attempt budget for the now-playing round trip. Shorter than the poll
/// interval so a hung peer cannot stack up attempts.
pub(super) const NET_TIMEOUT: Duration = Duration::from_secs(2);

const TICK_INTERVAL: Duration = Duration::from_secs(1);
const SLEEP_SLICE: Duration = Duration::from_millis(100);

pub(super) fn start_poller(
    store: DisplayStore,
    host: String,
    port: u16,
    interval: Duration,
    running: Arc<AtomicBool>,
    logger: Arc<Logger>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("trackline-poller".into())
        .spawn(move || {
            while running.load(Ordering::SeqCst) {
                let start = Instant::now();
                let track = match nowplaying::fetch(&host, port, NET_TIMEOUT) {
                    Ok(track) => {
                        logger.debug(format!(
                            "now playing: '{}' / '{}' ({}s left)",
                            track.artist, track.title, track.remaining_seconds
                        ));
                        track
                    }
                    Err(err) => {
                        logger.warn(format!("now-playing query failed: {err}; using fallback"));
                        TrackInfo::fallback()
                    }
                };
                store.update_track(&track.artist, &track.title);
                store.set_remaining(track.remaining_seconds);
                sleep_remainder(start, interval, &running);
            }
        })
        .expect("failed to spawn poller thread")
}

pub(super) fn start_ticker(store: DisplayStore, running: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::Builder::new()
        .name("trackline-ticker".into())
        .spawn(move || {
            while running.load(Ordering::SeqCst) {
                let start = Instant::now();
                store.tick();
                sleep_remainder(start, TICK_INTERVAL, &running);
            }
        })
        .expect("failed to spawn ticker thread")
}

pub(super) fn start_scroller(
    store: DisplayStore,
    interval: Duration,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("trackline-scroller".into())
        .spawn(move || {
            while running.load(Ordering::SeqCst) {
                let start = Instant::now();
                store.advance_scrolls();
                sleep_remainder(start, interval, &running);
            }
        })
        .expect("failed to spawn scroller thread")
}

fn sleep_remainder(start: Instant, interval: Duration, running: &AtomicBool) {
    let deadline = start + interval;
    while running.load(Ordering::SeqCst) {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            break;
        }
        thread::sleep(left.min(SLEEP_SLICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Widget;

    fn test_store() -> DisplayStore {
        DisplayStore::new(Widget::new(28, 13), Widget::new(1, 20))
    }

    #[test]
    fn ticker_counts_down_and_stops_on_flag() {
        let store = test_store();
        store.set_remaining(100);
        let running = Arc::new(AtomicBool::new(true));
        let handle = start_ticker(store.clone(), running.clone());

        // first tick happens immediately on loop entry
        thread::sleep(Duration::from_millis(200));
        running.store(false, Ordering::SeqCst);
        handle.join().unwrap();
        assert!(store.snapshot().remaining_seconds < 100);
    }

    #[test]
    fn scroller_advances_scrolling_widgets() {
        let store = test_store();
        store.update_track("a very long artist name here", "Help!");
        let running = Arc::new(AtomicBool::new(true));
        let handle = start_scroller(store.clone(), Duration::from_millis(10), running.clone());

        thread::sleep(Duration::from_millis(100));
        running.store(false, Ordering::SeqCst);
        handle.join().unwrap();
        let snap = store.snapshot();
        assert!(snap.artist.is_scrolling());
        assert!(!snap.title.is_scrolling());
    }

    #[test]
    fn poller_falls_back_when_service_is_down() {
        let store = test_store();
        let running = Arc::new(AtomicBool::new(true));
        let logger = Arc::new(Logger::new(super::super::LogLevel::Error, None));
        // port 1 on localhost: nothing listens there in the test environment
        let handle = start_poller(
            store.clone(),
            "127.0.0.1".into(),
            1,
            Duration::from_millis(50),
            running.clone(),
            logger,
        );

        thread::sleep(Duration::from_millis(300));
        running.store(false, Ordering::SeqCst);
        handle.join().unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.title.content(), "shell.fm stopped.");
        assert_eq!(snap.remaining_seconds, 0);
    }
}
