use std::sync::{mpsc, Arc};

use ga_monitor_core::{Effect, Msg};
use ga_monitor_engine::{
    ApiTransport, EngineEvent, EventSink, MonitorError, MonitorHandle, MonitorSettings,
};
use monitor_logging::{monitor_info, monitor_warn};

use super::login::LOGIN_HINT;

const ENGINE_DOWN: &str = "monitor engine is not running";

/// Executes effects returned by `update` against the engine.
pub struct EffectRunner {
    engine: MonitorHandle,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(
        api: Arc<dyn ApiTransport>,
        settings: MonitorSettings,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        let sink = Arc::new(MsgSink::new(msg_tx.clone()));
        Self {
            engine: MonitorHandle::new(api, settings, sink),
            msg_tx,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LaunchJob { request } => {
                    monitor_info!("LaunchJob days={}", request.range.days());
                    if !self.engine.launch(request) {
                        let _ = self.msg_tx.send(Msg::LaunchFailed {
                            message: ENGINE_DOWN.to_string(),
                        });
                    }
                }
                Effect::StopJob { job_id } => {
                    monitor_info!("StopJob job_id={}", job_id);
                    if !self.engine.stop(job_id.clone()) {
                        let _ = self.msg_tx.send(Msg::StopFinished {
                            job_id,
                            acknowledged: false,
                        });
                    }
                }
                Effect::RequireLogin => {
                    eprintln!("{LOGIN_HINT}");
                }
            }
        }
    }
}

/// Feeds engine events back into the message loop.
pub struct MsgSink {
    tx: mpsc::Sender<Msg>,
}

impl MsgSink {
    pub fn new(tx: mpsc::Sender<Msg>) -> Self {
        Self { tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event_to_msg(event));
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Launched { job_id, at } => Msg::JobLaunched { job_id, at },
        EngineEvent::LaunchFailed { error } if error.is_auth_required() => {
            Msg::AuthRequired { job_id: None }
        }
        EngineEvent::LaunchFailed { error } => Msg::LaunchFailed {
            message: launch_message(&error),
        },
        EngineEvent::Snapshot {
            job_id,
            snapshot,
            at,
        } => Msg::SnapshotReceived {
            job_id,
            snapshot,
            at,
        },
        EngineEvent::JobInactive { job_id } => Msg::JobInactive { job_id },
        EngineEvent::PollFailed { job_id, error } if error.is_auth_required() => {
            Msg::AuthRequired {
                job_id: Some(job_id),
            }
        }
        EngineEvent::PollFailed { job_id, error } => {
            monitor_warn!("Polling job {} failed: {}", job_id, error);
            let message = match error {
                MonitorError::Poll { source, .. } => source.to_string(),
                other => other.to_string(),
            };
            Msg::PollFailed { job_id, message }
        }
        EngineEvent::Stopped(outcome) => Msg::StopFinished {
            job_id: outcome.job_id,
            acknowledged: outcome.acknowledged,
        },
        EngineEvent::Unavailable { message } => Msg::LaunchFailed { message },
    }
}

/// The server's own message when it sent one, else the error text.
fn launch_message(error: &MonitorError) -> String {
    match error {
        MonitorError::Launch(api) if !api.message.is_empty() => api.message.clone(),
        other => other.to_string(),
    }
}
