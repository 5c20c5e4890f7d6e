use std::sync::Arc;

use ga_monitor_engine::{LoginRedirect, TokenStore};
use monitor_logging::{monitor_error, monitor_warn};

/// Drops the rejected token so the next run starts logged out.
pub struct ClearTokenOnUnauthorized {
    tokens: Arc<dyn TokenStore>,
}

impl ClearTokenOnUnauthorized {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }
}

impl LoginRedirect for ClearTokenOnUnauthorized {
    fn login_required(&self) {
        monitor_warn!("Backend rejected the stored token; clearing it");
        if let Err(err) = self.tokens.clear() {
            monitor_error!("Failed to clear stored token: {}", err);
        }
    }
}

pub const LOGIN_HINT: &str = "Not authenticated. Run `ga_monitor login --token <TOKEN>` and try again.";
