use crate::{protocol::DISPLAY_COLS, Error, Result};
use std::path::Path;

pub mod loader;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 54_311;
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUD: u32 = 9_600;
pub const DEFAULT_SERIAL_TIMEOUT_MS: u64 = 1_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;
pub const DEFAULT_SCROLL_INTERVAL_MS: u64 = 800;
pub const DEFAULT_TITLE_START: u8 = 1;
pub const DEFAULT_TITLE_LEN: u8 = 20;
pub const DEFAULT_TIME_START: u8 = 21;
pub const DEFAULT_ARTIST_START: u8 = 28;
pub const DEFAULT_ARTIST_LEN: u8 = 13;

/// Width of the remaining-time field: `MM:SS` plus the `"| "` divider.
pub const TIME_FIELD_LEN: u8 = 7;

const CONFIG_DIR_NAME: &str = ".trackline";
const CONFIG_FILE_NAME: &str = "config.toml";

/// User-supplied settings loaded from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub device: String,
    pub baud: u32,
    pub serial_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub scroll_interval_ms: u64,
    pub title_start: u8,
    pub title_len: u8,
    pub time_start: u8,
    pub artist_start: u8,
    pub artist_len: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            device: DEFAULT_DEVICE.to_string(),
            baud: DEFAULT_BAUD,
            serial_timeout_ms: DEFAULT_SERIAL_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            scroll_interval_ms: DEFAULT_SCROLL_INTERVAL_MS,
            title_start: DEFAULT_TITLE_START,
            title_len: DEFAULT_TITLE_LEN,
            time_start: DEFAULT_TIME_START,
            artist_start: DEFAULT_ARTIST_START,
            artist_len: DEFAULT_ARTIST_LEN,
        }
    }
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        loader::load_or_default()
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        loader::load_from_path(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        loader::save_to_path(self, path)
    }
}

/// Fail fast on geometry that cannot be rendered: a bad layout is a config
/// error, not a runtime condition.
pub fn validate(cfg: &Config) -> Result<()> {
    if cfg.poll_interval_ms == 0 || cfg.scroll_interval_ms == 0 {
        return Err(Error::InvalidArgs(
            "poll_interval_ms and scroll_interval_ms must be positive".to_string(),
        ));
    }
    validate_layout(&[
        ("title", cfg.title_start, cfg.title_len),
        ("time", cfg.time_start, TIME_FIELD_LEN),
        ("artist", cfg.artist_start, cfg.artist_len),
    ])
}

/// Check that every `(name, start, length)` field fits in `1..=40` and that
/// no two fields overlap.
pub fn validate_layout(fields: &[(&str, u8, u8)]) -> Result<()> {
    for &(name, start, len) in fields {
        if start < 1 || len < 1 || start as u16 + len as u16 - 1 > DISPLAY_COLS as u16 {
            return Err(Error::InvalidArgs(format!(
                "{name} field does not fit the display: start {start}, length {len}"
            )));
        }
    }
    for (i, &(name_a, start_a, len_a)) in fields.iter().enumerate() {
        for &(name_b, start_b, len_b) in &fields[i + 1..] {
            let end_a = start_a + len_a - 1;
            let end_b = start_b + len_b - 1;
            if start_a <= end_b && start_b <= end_a {
                return Err(Error::InvalidArgs(format!(
                    "{name_a} and {name_b} fields overlap on the display"
                )));
            }
        }
    }
    Ok(())
}
