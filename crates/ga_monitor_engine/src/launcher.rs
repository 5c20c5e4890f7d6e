use std::sync::Arc;

use ga_monitor_core::{format_date, GaParameters, JobId, RunRequest};
use monitor_logging::{monitor_debug, monitor_info, monitor_warn};

use crate::wire::{self, StartResponse};
use crate::{ApiError, ApiFailureKind, ApiRequest, ApiTransport, JobHandle, JobSession, MonitorError};

/// Raw launch input as typed by the user; validated before any request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaunchParams {
    pub start_date: String,
    pub end_date: String,
    pub parameters: GaParameters,
}

impl LaunchParams {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            parameters: GaParameters::default(),
        }
    }
}

pub struct JobLauncher {
    api: Arc<dyn ApiTransport>,
}

impl JobLauncher {
    pub fn new(api: Arc<dyn ApiTransport>) -> Self {
        Self { api }
    }

    pub async fn launch(
        &self,
        session: &mut JobSession,
        params: &LaunchParams,
    ) -> Result<JobHandle, MonitorError> {
        let request = RunRequest::parse(&params.start_date, &params.end_date, params.parameters)?;
        self.launch_request(session, &request).await
    }

    /// Sends exactly one start request and records the new job in `session`.
    pub async fn launch_request(
        &self,
        session: &mut JobSession,
        request: &RunRequest,
    ) -> Result<JobHandle, MonitorError> {
        if let Some(active) = session.active() {
            monitor_warn!("Refusing to start a job while {} is active", active.id());
            return Err(MonitorError::JobAlreadyActive(active.id().clone()));
        }

        monitor_info!(
            "Starting GA job for {} to {}",
            format_date(request.range.start()),
            format_date(request.range.end())
        );
        let call = ApiRequest::post(wire::start_endpoint(&request.parameters))
            .with_json(wire::start_body(&request.range));
        let value = self.api.call(call).await.map_err(MonitorError::launch)?;

        let response = StartResponse::from_value(value).map_err(MonitorError::launch)?;
        if let Some(message) = response.message.as_deref() {
            monitor_debug!("Start response: {}", message);
        }
        let id = response
            .visualization_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                MonitorError::launch(ApiError::new(
                    ApiFailureKind::InvalidBody,
                    "start response has no visualizationId",
                ))
            })?;

        let handle = JobHandle::new(JobId::new(id));
        monitor_info!("GA job started with id {}", handle.id());
        session.begin(handle.clone());
        Ok(handle)
    }
}
