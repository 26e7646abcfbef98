use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

use super::{Config, CONFIG_DIR_NAME, CONFIG_FILE_NAME};

pub fn load_or_default() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        let cfg = Config::default();
        save_to_path(&cfg, &path)?;
        super::validate(&cfg)?;
        return Ok(cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        let cfg = Config::default();
        super::validate(&cfg)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(path)?;
    parse(&raw)
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = format!(
        "# trackline config\n\
host = \"{}\"\n\
port = {}\n\
device = \"{}\"\n\
baud = {}\n\
serial_timeout_ms = {}\n\
poll_interval_ms = {}\n\
scroll_interval_ms = {}\n\
title_start = {}\n\
title_len = {}\n\
time_start = {}\n\
artist_start = {}\n\
artist_len = {}\n",
        config.host,
        config.port,
        config.device,
        config.baud,
        config.serial_timeout_ms,
        config.poll_interval_ms,
        config.scroll_interval_ms,
        config.title_start,
        config.title_len,
        config.time_start,
        config.artist_start,
        config.artist_len,
    );
    fs::write(path, contents)?;
    Ok(())
}

pub fn parse(raw: &str) -> Result<Config> {
    let mut cfg = Config::default();

    for (idx, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) = trimmed.split_once('=').ok_or_else(|| {
            Error::InvalidArgs(format!("invalid config line {}: '{}'", idx + 1, line))
        })?;

        let key = key.trim();
        let value = value.trim().trim_matches('"');
        match key {
            "host" => cfg.host = value.to_string(),
            "port" => {
                cfg.port = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid port value on line {}", idx + 1))
                })?;
            }
            "device" => cfg.device = value.to_string(),
            "baud" => {
                cfg.baud = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid baud value on line {}", idx + 1))
                })?;
            }
            "serial_timeout_ms" => {
                cfg.serial_timeout_ms = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid serial_timeout_ms on line {}", idx + 1))
                })?;
            }
            "poll_interval_ms" => {
                cfg.poll_interval_ms = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid poll_interval_ms on line {}", idx + 1))
                })?;
            }
            "scroll_interval_ms" => {
                cfg.scroll_interval_ms = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid scroll_interval_ms on line {}", idx + 1))
                })?;
            }
            "title_start" => {
                cfg.title_start = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid title_start on line {}", idx + 1))
                })?;
            }
            "title_len" => {
                cfg.title_len = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid title_len on line {}", idx + 1))
                })?;
            }
            "time_start" => {
                cfg.time_start = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid time_start on line {}", idx + 1))
                })?;
            }
            "artist_start" => {
                cfg.artist_start = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid artist_start on line {}", idx + 1))
                })?;
            }
            "artist_len" => {
                cfg.artist_len = value.parse().map_err(|_| {
                    Error::InvalidArgs(format!("invalid artist_len on line {}", idx + 1))
                })?;
            }
            other => {
                return Err(Error::InvalidArgs(format!(
                    "unknown config key '{}' on line {}",
                    other,
                    idx + 1
                )));
            }
        }
    }

    super::validate(&cfg)?;
    Ok(cfg)
}

fn config_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| Error::InvalidArgs("HOME not set; cannot locate config directory".into()))?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
