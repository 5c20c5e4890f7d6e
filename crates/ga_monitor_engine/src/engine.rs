use std::sync::{mpsc, Arc};
use std::thread;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use ga_monitor_core::{JobId, ProgressSnapshot, RunRequest};
use monitor_logging::{monitor_debug, monitor_error, monitor_warn};
use tokio::sync::mpsc as tokio_mpsc;

use crate::{
    ApiTransport, CancellationController, JobHandle, JobLauncher, JobSession, MonitorError,
    MonitorSettings, PollingLoop, SnapshotStream, StopOutcome,
};

enum EngineCommand {
    Launch { request: RunRequest },
    Stop { job_id: JobId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Launched {
        job_id: JobId,
        at: DateTime<Utc>,
    },
    LaunchFailed {
        error: MonitorError,
    },
    Snapshot {
        job_id: JobId,
        snapshot: ProgressSnapshot,
        at: DateTime<Utc>,
    },
    /// Polling ended without a completed snapshot.
    JobInactive {
        job_id: JobId,
    },
    PollFailed {
        job_id: JobId,
        error: MonitorError,
    },
    /// Answer to every stop command, also when the job had already ended.
    Stopped(StopOutcome),
    /// The engine thread could not start its runtime.
    Unavailable {
        message: String,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs launcher, polling loops and canceller on one background thread with a
/// single-threaded runtime. Commands are handled in the order they are sent.
pub struct MonitorHandle {
    cmd_tx: tokio_mpsc::UnboundedSender<EngineCommand>,
}

impl MonitorHandle {
    pub fn new(
        api: Arc<dyn ApiTransport>,
        settings: MonitorSettings,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = tokio_mpsc::unbounded_channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    monitor_error!("Failed to start engine runtime: {}", err);
                    drop(cmd_rx);
                    sink.emit(EngineEvent::Unavailable {
                        message: err.to_string(),
                    });
                    return;
                }
            };
            runtime.block_on(run_commands(api, settings, cmd_rx, sink));
        });

        Self { cmd_tx }
    }

    /// Queues a launch. Returns `false` when the engine thread is gone.
    pub fn launch(&self, request: RunRequest) -> bool {
        let sent = self.cmd_tx.send(EngineCommand::Launch { request }).is_ok();
        if !sent {
            monitor_warn!("Engine is not running; launch dropped");
        }
        sent
    }

    /// Queues a stop of `job_id`. Exactly one `Stopped` event follows.
    /// Returns `false` when the engine thread is gone.
    pub fn stop(&self, job_id: JobId) -> bool {
        let sent = self.cmd_tx.send(EngineCommand::Stop { job_id }).is_ok();
        if !sent {
            monitor_warn!("Engine is not running; stop dropped");
        }
        sent
    }
}

async fn run_commands(
    api: Arc<dyn ApiTransport>,
    settings: MonitorSettings,
    mut cmd_rx: tokio_mpsc::UnboundedReceiver<EngineCommand>,
    sink: Arc<dyn EventSink>,
) {
    let launcher = JobLauncher::new(api.clone());
    let poller = PollingLoop::new(api.clone(), settings.poll_interval);
    let canceller = CancellationController::new(api);
    let mut session = JobSession::new();

    while let Some(command) = cmd_rx.recv().await {
        match command {
            EngineCommand::Launch { request } => {
                match launcher.launch_request(&mut session, &request).await {
                    Ok(handle) => {
                        sink.emit(EngineEvent::Launched {
                            job_id: handle.id().clone(),
                            at: Utc::now(),
                        });
                        let stream = poller.start(&handle);
                        tokio::spawn(forward_snapshots(handle, stream, sink.clone()));
                    }
                    Err(error) => sink.emit(EngineEvent::LaunchFailed { error }),
                }
            }
            EngineCommand::Stop { job_id } => {
                let outcome = match canceller.cancel(&mut session).await {
                    Some(outcome) => outcome,
                    None => {
                        monitor_debug!("Job {} already ended; nothing to stop", job_id);
                        StopOutcome {
                            job_id,
                            acknowledged: false,
                        }
                    }
                };
                sink.emit(EngineEvent::Stopped(outcome));
            }
        }
    }
    monitor_debug!("Engine command channel closed");
}

async fn forward_snapshots(
    handle: JobHandle,
    mut stream: SnapshotStream,
    sink: Arc<dyn EventSink>,
) {
    let job_id = handle.id().clone();
    let mut completed = false;

    while let Some(item) = stream.next().await {
        if handle.is_cancelled() {
            monitor_debug!("Dropping poll result for cancelled job {}", job_id);
            return;
        }
        match item {
            Ok(snapshot) => {
                completed = snapshot.completed;
                sink.emit(EngineEvent::Snapshot {
                    job_id: job_id.clone(),
                    snapshot,
                    at: Utc::now(),
                });
            }
            Err(error) => {
                sink.emit(EngineEvent::PollFailed { job_id, error });
                return;
            }
        }
    }

    if !completed && !handle.is_cancelled() {
        sink.emit(EngineEvent::JobInactive { job_id });
    }
}
