use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::Stream;
use ga_monitor_core::ProgressSnapshot;
use monitor_logging::{monitor_debug, monitor_info, monitor_warn};
use serde_json::Value;

use crate::wire::{self, StatusResponse};
use crate::{ApiError, ApiRequest, ApiTransport, JobHandle, MonitorError};

/// Lazy, finite, non-restartable sequence of progress snapshots for one job.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = Result<ProgressSnapshot, MonitorError>> + Send>>;

enum PollStep {
    Progress(ProgressSnapshot),
    Completed(ProgressSnapshot),
    Failed(MonitorError),
    Inactive,
}

pub struct PollingLoop {
    api: Arc<dyn ApiTransport>,
    interval: Duration,
}

impl PollingLoop {
    pub fn new(api: Arc<dyn ApiTransport>, interval: Duration) -> Self {
        Self { api, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls the job's status every `interval` until it completes, goes
    /// inactive, fails or `handle` is cancelled.
    ///
    /// Each tick waits for the previous response, so at most one status
    /// request is in flight. A response that resolves after cancellation is
    /// dropped. A failed query is yielded once and ends the stream.
    pub fn start(&self, handle: &JobHandle) -> SnapshotStream {
        let api = self.api.clone();
        let interval = self.interval;
        let handle = handle.clone();

        Box::pin(async_stream::stream! {
            let job_id = handle.id().clone();
            let cancel = handle.cancellation().clone();
            let endpoint = wire::status_endpoint(&job_id);
            let mut tick: u64 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        monitor_debug!("Polling for job {} cancelled", job_id);
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {}
                }

                tick += 1;
                let response = api.call(ApiRequest::get(endpoint.clone())).await;

                if cancel.is_cancelled() {
                    monitor_debug!("Discarding status response for job {} after cancellation", job_id);
                    break;
                }

                match monitor_logging::with_poll_tick(tick, || read_status(&handle, response)) {
                    PollStep::Progress(snapshot) => yield Ok(snapshot),
                    PollStep::Completed(snapshot) => {
                        yield Ok(snapshot);
                        break;
                    }
                    PollStep::Failed(err) => {
                        yield Err(err);
                        break;
                    }
                    PollStep::Inactive => break,
                }
            }
        })
    }
}

/// Interprets one status response. Marks the handle finished when polling must end.
fn read_status(handle: &JobHandle, response: Result<Value, ApiError>) -> PollStep {
    let job_id = handle.id();
    let status = match response.and_then(StatusResponse::from_value) {
        Ok(status) => status,
        Err(err) => {
            monitor_warn!("Status query for job {} failed: {}", job_id, err);
            handle.mark_finished();
            return PollStep::Failed(MonitorError::poll(job_id.clone(), err));
        }
    };

    if !status.active {
        monitor_info!(
            "Job {} is no longer active ({})",
            job_id,
            status.message.as_deref().unwrap_or("no message")
        );
        handle.mark_finished();
        return PollStep::Inactive;
    }

    let Some(snapshot) = status.into_snapshot() else {
        handle.mark_finished();
        return PollStep::Inactive;
    };
    monitor_debug!(
        "Generation {}/{} for job {}",
        snapshot.current_generation,
        snapshot.total_generations,
        job_id
    );

    if snapshot.completed {
        monitor_info!("Job {} completed", job_id);
        handle.mark_finished();
        PollStep::Completed(snapshot)
    } else {
        PollStep::Progress(snapshot)
    }
}
