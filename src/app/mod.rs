use std::str::FromStr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod lifecycle;
mod logger;
mod render_loop;
mod tasks;

pub use logger::LogLevel;
pub(crate) use logger::Logger;

use crate::{
    cli::RunOptions,
    config::{self, Config},
    nowplaying::{self, TrackInfo},
    protocol,
    serial::SerialPort,
    store::DisplayStore,
    widget::Widget,
    Result,
};
use lifecycle::{create_shutdown_flag, write_farewell};
use render_loop::run_render_loop;

const SPLASH: &str = "trackline  -  shell.fm display";
const SPLASH_HOLD: Duration = Duration::from_secs(2);

/// Runtime settings after merging the config file and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
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
    pub log_level: LogLevel,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_sources(Config::default(), RunOptions::default())
    }
}

impl AppConfig {
    pub fn from_sources(config: Config, opts: RunOptions) -> Self {
        Self {
            host: opts.host.unwrap_or_else(|| config.host.clone()),
            port: opts.port.unwrap_or(config.port),
            device: opts.device.unwrap_or_else(|| config.device.clone()),
            baud: opts.baud.unwrap_or(config.baud),
            serial_timeout_ms: config.serial_timeout_ms,
            poll_interval_ms: opts.poll_interval_ms.unwrap_or(config.poll_interval_ms),
            scroll_interval_ms: opts.scroll_interval_ms.unwrap_or(config.scroll_interval_ms),
            title_start: config.title_start,
            title_len: config.title_len,
            time_start: config.time_start,
            artist_start: config.artist_start,
            artist_len: config.artist_len,
            log_level: opts
                .log_level
                .as_deref()
                .and_then(|s| LogLevel::from_str(s).ok())
                .unwrap_or_default(),
            log_file: opts.log_file,
        }
    }

    /// Geometry can arrive programmatically as well as from the config file,
    /// so it is re-checked here before any hardware is touched.
    pub fn validate(&self) -> Result<()> {
        config::validate_layout(&[
            ("title", self.title_start, self.title_len),
            ("time", self.time_start, config::TIME_FIELD_LEN),
            ("artist", self.artist_start, self.artist_len),
        ])
    }
}

pub struct App {
    config: AppConfig,
    logger: Arc<Logger>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let logger = Arc::new(Logger::new(config.log_level, config.log_file.clone()));
        Self { config, logger }
    }

    pub fn from_options(opts: RunOptions) -> Result<Self> {
        let cfg_file = Config::load_or_default()?;
        Ok(Self::new(AppConfig::from_sources(cfg_file, opts)))
    }

    /// Entry point for the daemon: serial splash, seed poll, background
    /// loops, render loop, farewell.
    pub fn run(&self) -> Result<()> {
        let config = self.config.clone();
        config.validate()?;

        let mut port =
            SerialPort::connect(&config.device, config.baud, config.serial_timeout_ms)?;
        self.logger.info(format!(
            "daemon start (device={}, baud={}, source={}:{})",
            config.device, config.baud, config.host, config.port
        ));

        protocol::write_text(&mut port, SPLASH, 1, protocol::DISPLAY_COLS, true)?;
        thread::sleep(SPLASH_HOLD);

        let store = DisplayStore::new(
            Widget::new(config.artist_start, config.artist_len),
            Widget::new(config.title_start, config.title_len),
        );

        // Seed the store synchronously so the first render pass has real data.
        let seed = nowplaying::fetch(&config.host, config.port, tasks::NET_TIMEOUT)
            .unwrap_or_else(|err| {
                self.logger
                    .warn(format!("initial now-playing query failed: {err}; using fallback"));
                TrackInfo::fallback()
            });
        store.update_track(&seed.artist, &seed.title);
        store.set_remaining(seed.remaining_seconds);

        let running = create_shutdown_flag()?;
        let poller = tasks::start_poller(
            store.clone(),
            config.host.clone(),
            config.port,
            Duration::from_millis(config.poll_interval_ms),
            running.clone(),
            self.logger.clone(),
        );
        let ticker = tasks::start_ticker(store.clone(), running.clone());
        let scroller = tasks::start_scroller(
            store.clone(),
            Duration::from_millis(config.scroll_interval_ms),
            running.clone(),
        );

        let result = run_render_loop(&mut port, &store, config.time_start, &self.logger, &running);

        // The renderer exits on shutdown or a fatal error; either way stop
        // the background loops before the farewell write.
        running.store(false, Ordering::SeqCst);
        write_farewell(&mut port);
        for handle in [poller, ticker, scroller] {
            let _ = handle.join();
        }
        self.logger.info("daemon exiting");
        result
    }
}
