use monitor_logging::monitor_warn;

use crate::{Effect, MessageKind, MonitorState, Msg, RunRequest, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: MonitorState, msg: Msg) -> (MonitorState, Vec<Effect>) {
    let effects = match msg {
        Msg::RunRequested {
            start_date,
            end_date,
            parameters,
        } => {
            // One job per session: a second run is rejected rather than queued.
            if let Some(job_id) = state.live_job_id().cloned() {
                monitor_warn!("Run requested while job {} is still live", job_id);
                state.set_message(
                    MessageKind::Error,
                    format!("A GA job is already running (ID: {job_id})"),
                );
                return (state, Vec::new());
            }
            if state.session() == SessionState::Launching {
                state.set_message(MessageKind::Error, "A GA job is already starting");
                return (state, Vec::new());
            }

            match RunRequest::parse(&start_date, &end_date, parameters) {
                Ok(request) => {
                    state.begin_launch();
                    vec![Effect::LaunchJob { request }]
                }
                Err(err) => {
                    state.set_message(MessageKind::Error, err.to_string());
                    Vec::new()
                }
            }
        }
        Msg::JobLaunched { job_id, at } => match state.job_launched(job_id, at) {
            Some(job_id) => vec![Effect::StopJob { job_id }],
            None => Vec::new(),
        },
        Msg::LaunchFailed { message } => {
            state.launch_failed(&message);
            Vec::new()
        }
        Msg::AuthRequired { job_id } => {
            state.auth_required(job_id.as_ref());
            vec![Effect::RequireLogin]
        }
        Msg::SnapshotReceived {
            job_id,
            snapshot,
            at,
        } => {
            state.apply_snapshot(&job_id, snapshot, at);
            Vec::new()
        }
        Msg::JobInactive { job_id } => {
            state.job_inactive(&job_id);
            Vec::new()
        }
        Msg::PollFailed { job_id, message } => {
            state.poll_failed(&job_id, &message);
            Vec::new()
        }
        Msg::StopClicked => match state.stop() {
            Some(job_id) => vec![Effect::StopJob { job_id }],
            None => Vec::new(),
        },
        Msg::StopFinished {
            job_id,
            acknowledged,
        } => {
            state.stop_finished(&job_id, acknowledged);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
