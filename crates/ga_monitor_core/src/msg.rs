use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked for a GA run over the given (unvalidated) dates.
    RunRequested {
        start_date: String,
        end_date: String,
        parameters: crate::GaParameters,
    },
    /// The server accepted the start request.
    JobLaunched {
        job_id: crate::JobId,
        at: DateTime<Utc>,
    },
    /// The start request failed.
    LaunchFailed { message: String },
    /// Any request answered 401. `job_id` names the job being polled, if any.
    AuthRequired { job_id: Option<crate::JobId> },
    /// One poll tick produced a snapshot.
    SnapshotReceived {
        job_id: crate::JobId,
        snapshot: crate::ProgressSnapshot,
        at: DateTime<Utc>,
    },
    /// The server reported the job inactive or unknown.
    JobInactive { job_id: crate::JobId },
    /// A status query failed; polling has stopped.
    PollFailed {
        job_id: crate::JobId,
        message: String,
    },
    /// User clicked Stop.
    StopClicked,
    /// The stop request resolved (or failed) after local cancellation.
    StopFinished {
        job_id: crate::JobId,
        acknowledged: bool,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
