use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ga_monitor_engine::{ApiSettings, MonitorSettings, DEFAULT_BASE_URL};
use serde::Deserialize;

use crate::cli::RunArgs;
use crate::platform::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "./ga_monitor.ron";
const DEFAULT_TOKEN_FILE: &str = "./.ga_monitor_token.ron";

/// Settings read from `ga_monitor.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub batch_size: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub token_file: PathBuf,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        let monitor = MonitorSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: duration_millis(monitor.poll_interval),
            batch_size: monitor.batch_size,
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            log_destination: LogDestination::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No config file at the default location.
    Defaults,
}

impl AppConfig {
    /// Reads the config file. A missing default file yields defaults; a missing
    /// file named on the command line is an error.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
                return Ok((Self::default(), ConfigSource::Defaults));
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read config {}", path.display()))
            }
        };
        let config = Self::parse(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Applies command-line overrides from `ga_monitor run`.
    pub fn with_run_overrides(mut self, args: &RunArgs) -> Self {
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(interval) = args.interval_ms {
            self.poll_interval_ms = interval;
        }
        self
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            batch_size: self.batch_size.max(1),
        }
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
