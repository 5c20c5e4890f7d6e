use chrono::{DateTime, Utc};
use monitor_logging::{monitor_debug, monitor_info, monitor_warn};

use crate::view_model::MonitorViewModel;
use crate::{Batch, Fitness, Job, JobId, JobStatus, ProgressSnapshot, UpdateBatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// Start request sent, no job id yet.
    Launching,
    /// A job is live and being polled.
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// Fitness chart data, one point per rendered generation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub labels: Vec<u32>,
    pub best: Vec<f64>,
    pub average: Vec<f64>,
    pub worst: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn push(&mut self, generation: u32, fitness: Fitness) {
        self.labels.push(generation);
        self.best.push(fitness.best);
        self.average.push(fitness.average);
        self.worst.push(fitness.worst);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonitorState {
    session: SessionState,
    job: Option<Job>,
    stop_requested: bool,
    batcher: UpdateBatcher,
    latest: Option<ProgressSnapshot>,
    chart: ChartSeries,
    message: Option<StatusMessage>,
    batches_rendered: u64,
    dirty: bool,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batcher: UpdateBatcher::new(batch_size),
            ..Self::default()
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// The current job, or the last one once it reached a terminal state.
    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn live_job_id(&self) -> Option<&JobId> {
        self.job.as_ref().filter(|job| job.is_live()).map(Job::id)
    }

    pub fn latest(&self) -> Option<&ProgressSnapshot> {
        self.latest.as_ref()
    }

    pub fn chart(&self) -> &ChartSeries {
        &self.chart
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn batches_rendered(&self) -> u64 {
        self.batches_rendered
    }

    pub fn view(&self) -> MonitorViewModel {
        MonitorViewModel::from_state(self)
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_message(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            kind,
            text: text.into(),
        });
        self.dirty = true;
    }

    pub(crate) fn begin_launch(&mut self) {
        self.session = SessionState::Launching;
        self.stop_requested = false;
        self.batcher = UpdateBatcher::new(self.batcher.batch_size());
        self.latest = None;
        self.chart = ChartSeries::default();
        self.message = None;
        self.batches_rendered = 0;
        self.dirty = true;
    }

    /// Records the new job. Returns its id when a stop arrived while launching
    /// and the job must be stopped right away.
    pub(crate) fn job_launched(&mut self, job_id: JobId, at: DateTime<Utc>) -> Option<JobId> {
        if self.session != SessionState::Launching {
            monitor_warn!("Ignoring launch of job {} without a pending run", job_id);
            return None;
        }

        monitor_info!("GA job {} started", job_id);
        self.job = Some(Job::new(job_id.clone(), at));
        self.session = SessionState::Running;
        self.set_message(
            MessageKind::Info,
            format!("GA Process Started (ID: {job_id})..."),
        );

        if std::mem::take(&mut self.stop_requested) {
            monitor_info!("Stop was requested while job {} was launching", job_id);
            self.end_job(JobStatus::Cancelled);
            self.set_message(MessageKind::Info, format!("Stopping GA job {job_id}"));
            return Some(job_id);
        }
        None
    }

    pub(crate) fn launch_failed(&mut self, message: &str) {
        if self.session != SessionState::Launching {
            return;
        }
        self.session = SessionState::Idle;
        self.stop_requested = false;
        self.set_message(MessageKind::Error, format!("Error starting GA: {message}"));
    }

    /// Applies one poll result. Snapshots for anything but the live job are
    /// discarded and `false` is returned.
    pub(crate) fn apply_snapshot(
        &mut self,
        job_id: &JobId,
        snapshot: ProgressSnapshot,
        at: DateTime<Utc>,
    ) -> bool {
        {
            let Some(job) = self
                .job
                .as_mut()
                .filter(|job| job.id() == job_id && job.is_live())
            else {
                monitor_debug!("Discarding snapshot for job {} that is not live", job_id);
                return false;
            };
            job.mark_polled(at);
            if let Err(err) = job.transition(JobStatus::Active) {
                monitor_warn!("{}", err);
            }
        }

        let completed = snapshot.completed;
        if let Some(batch) = self.batcher.push(snapshot) {
            self.apply_batch(batch);
        }

        if completed {
            self.end_job(JobStatus::Completed);
            self.set_message(MessageKind::Success, format!("GA job {job_id} completed"));
        }
        true
    }

    pub(crate) fn job_inactive(&mut self, job_id: &JobId) {
        if self.live_job_id() != Some(job_id) {
            return;
        }
        if let Some(batch) = self.batcher.finish() {
            self.apply_batch(batch);
        }
        self.end_job(JobStatus::Completed);
        self.set_message(
            MessageKind::Info,
            format!("GA job {job_id} is no longer active"),
        );
    }

    pub(crate) fn poll_failed(&mut self, job_id: &JobId, message: &str) {
        if self.live_job_id() != Some(job_id) {
            return;
        }
        self.batcher.discard();
        self.end_job(JobStatus::Failed);
        self.set_message(
            MessageKind::Error,
            format!("GA job {job_id} failed: {message}"),
        );
    }

    /// Cancels the live job locally. Returns the id the stop request must be sent for.
    pub(crate) fn stop(&mut self) -> Option<JobId> {
        if self.session == SessionState::Launching {
            self.stop_requested = true;
            self.set_message(MessageKind::Info, "Stop requested, waiting for job id");
            return None;
        }

        let job_id = self.live_job_id()?.clone();
        self.batcher.discard();
        self.end_job(JobStatus::Cancelled);
        self.set_message(MessageKind::Info, format!("Stopping GA job {job_id}"));
        Some(job_id)
    }

    pub(crate) fn stop_finished(&mut self, job_id: &JobId, acknowledged: bool) {
        if acknowledged {
            self.set_message(MessageKind::Success, format!("GA job {job_id} stopped"));
        } else {
            self.set_message(
                MessageKind::Warning,
                format!("GA job {job_id} stopped locally; the server did not confirm"),
            );
        }
    }

    pub(crate) fn auth_required(&mut self, job_id: Option<&JobId>) {
        if job_id.is_some() && self.live_job_id() == job_id {
            self.batcher.discard();
            self.end_job(JobStatus::Failed);
        }
        if self.session == SessionState::Launching {
            self.session = SessionState::Idle;
            self.stop_requested = false;
        }
        self.set_message(
            MessageKind::Error,
            "Not authenticated. Please log in again.",
        );
    }

    fn apply_batch(&mut self, batch: Batch) {
        for snapshot in &batch.snapshots {
            if let Some(fitness) = snapshot.fitness {
                self.chart.push(snapshot.current_generation, fitness);
            }
        }
        if let Some(latest) = batch.latest() {
            self.latest = Some(latest.clone());
        }
        self.batches_rendered += 1;
        self.dirty = true;
    }

    fn end_job(&mut self, status: JobStatus) {
        if let Some(job) = self.job.as_mut() {
            if let Err(err) = job.transition(status) {
                monitor_warn!("{}", err);
            }
        }
        self.session = SessionState::Idle;
        self.dirty = true;
    }
}
