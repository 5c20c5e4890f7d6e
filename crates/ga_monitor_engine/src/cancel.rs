use std::sync::Arc;

use ga_monitor_core::JobId;
use monitor_logging::{monitor_debug, monitor_error, monitor_info};

use crate::{wire, ApiRequest, ApiTransport, JobSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopOutcome {
    pub job_id: JobId,
    /// Whether the server confirmed the stop. Local polling halts either way.
    pub acknowledged: bool,
}

pub struct CancellationController {
    api: Arc<dyn ApiTransport>,
}

impl CancellationController {
    pub fn new(api: Arc<dyn ApiTransport>) -> Self {
        Self { api }
    }

    /// Halts the live job's polling, clears it from the session, then asks
    /// the server to stop it. A no-op returning `None` when nothing is live.
    pub async fn cancel(&self, session: &mut JobSession) -> Option<StopOutcome> {
        let Some(handle) = session.take_active() else {
            monitor_debug!("No active GA job to stop");
            return None;
        };
        handle.cancel();

        let job_id = handle.id().clone();
        monitor_info!("Stopping GA job {}", job_id);
        let acknowledged = match self
            .api
            .call(ApiRequest::post(wire::stop_endpoint(&job_id)))
            .await
        {
            Ok(_) => {
                monitor_info!("GA job {} stopped", job_id);
                true
            }
            Err(err) => {
                monitor_error!("Failed to stop GA job {}: {}", job_id, err);
                false
            }
        };

        Some(StopOutcome {
            job_id,
            acknowledged,
        })
    }
}
