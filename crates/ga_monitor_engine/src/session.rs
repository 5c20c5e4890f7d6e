use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ga_monitor_core::JobId;
use tokio_util::sync::CancellationToken;

/// A launched job. Clones share cancellation and completion state.
#[derive(Debug, Clone)]
pub struct JobHandle {
    id: JobId,
    cancel: CancellationToken,
    finished: Arc<AtomicBool>,
}

impl JobHandle {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            cancel: CancellationToken::new(),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Withdraws the polling loop's continuation. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether polling ended on its own (completed, inactive or failed).
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn is_terminated(&self) -> bool {
        self.is_cancelled() || self.is_finished()
    }

    pub(crate) fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub(crate) fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Owner of "the job currently running". At most one live job at a time.
#[derive(Debug, Default)]
pub struct JobSession {
    current: Option<JobHandle>,
}

impl JobSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live job, forgetting one that has terminated in the meantime.
    pub fn active(&mut self) -> Option<&JobHandle> {
        if self.current.as_ref().is_some_and(JobHandle::is_terminated) {
            self.current = None;
        }
        self.current.as_ref()
    }

    pub(crate) fn begin(&mut self, handle: JobHandle) {
        self.current = Some(handle);
    }

    pub(crate) fn take_active(&mut self) -> Option<JobHandle> {
        self.active()?;
        self.current.take()
    }
}
