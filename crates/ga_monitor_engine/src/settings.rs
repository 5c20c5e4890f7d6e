use std::time::Duration;

use ga_monitor_core::BATCH_SIZE;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8090/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Prefix for every endpoint, without a trailing slash.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub batch_size: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            batch_size: BATCH_SIZE,
        }
    }
}
