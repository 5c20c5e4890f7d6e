use std::fmt;

use ga_monitor_core::{JobId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiFailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_auth_required(&self) -> bool {
        self.kind == ApiFailureKind::AuthRequired
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailureKind {
    /// The backend answered 401.
    AuthRequired,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidUrl,
    InvalidBody,
}

impl fmt::Display for ApiFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailureKind::AuthRequired => write!(f, "not authenticated"),
            ApiFailureKind::HttpStatus(code) => write!(f, "api error ({code})"),
            ApiFailureKind::Timeout => write!(f, "timeout"),
            ApiFailureKind::Network => write!(f, "network error"),
            ApiFailureKind::InvalidUrl => write!(f, "invalid url"),
            ApiFailureKind::InvalidBody => write!(f, "invalid response body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MonitorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("job {0} is already active")]
    JobAlreadyActive(JobId),
    #[error("failed to launch GA job: {0}")]
    Launch(ApiError),
    #[error("failed to poll GA job {job_id}: {source}")]
    Poll { job_id: JobId, source: ApiError },
    #[error("not authenticated")]
    AuthRequired,
}

impl MonitorError {
    /// A 401 from any call surfaces as `AuthRequired`.
    pub(crate) fn launch(err: ApiError) -> Self {
        if err.is_auth_required() {
            MonitorError::AuthRequired
        } else {
            MonitorError::Launch(err)
        }
    }

    pub(crate) fn poll(job_id: JobId, err: ApiError) -> Self {
        if err.is_auth_required() {
            MonitorError::AuthRequired
        } else {
            MonitorError::Poll {
                job_id,
                source: err,
            }
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, MonitorError::AuthRequired)
    }
}
