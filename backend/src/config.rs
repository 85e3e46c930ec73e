//! Server settings.
//!
//! Read once at startup from an optional TOML file. The path comes from the
//! `KPI_CONFIG` environment variable; without it `kpi.toml` in the working
//! directory is used when present. Every key is optional and falls back to
//! the defaults below.

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "KPI_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "kpi.toml";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// SQLite file holding the config and submission documents.
    pub database_path: PathBuf,
    /// Built frontend (`trunk build` output).
    pub static_dir: PathBuf,
    /// Directory with the TTF files used by the PDF export.
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub open_browser: bool,
    /// Default `env_logger` filter, overridden by `RUST_LOG`.
    pub log_level: String,
    /// Offset of the lock deadline's wall clock from UTC, in minutes.
    pub utc_offset_minutes: i32,
    pub json_limit_bytes: usize,
    /// Capacity of the change feed before slow subscribers lag.
    pub feed_capacity: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("kpi.sqlite"),
            static_dir: PathBuf::from("static/dist"),
            fonts_dir: PathBuf::from("./fonts"),
            font_family: "LiberationSans".to_string(),
            open_browser: false,
            log_level: "info".to_string(),
            utc_offset_minutes: 0,
            json_limit_bytes: 1024 * 1024,
            feed_capacity: 64,
        }
    }
}

impl ServerSettings {
    pub fn load() -> Result<Self, SettingsError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Offset applied to the lock deadline. Out-of-range values fall back to UTC.
    pub fn lock_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| {
            log::warn!(
                "utc_offset_minutes={} is out of range, using UTC",
                self.utc_offset_minutes
            );
            Utc.fix()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_use_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9090\nutc_offset_minutes = -360").unwrap();
        let settings = ServerSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.lock_offset(), FixedOffset::west_opt(6 * 3600).unwrap());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prot = 9090").unwrap();
        assert!(matches!(
            ServerSettings::from_file(file.path()),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn absurd_offset_falls_back_to_utc() {
        let settings = ServerSettings {
            utc_offset_minutes: 100_000,
            ..ServerSettings::default()
        };
        assert_eq!(settings.lock_offset().local_minus_utc(), 0);
    }
}
