use crate::{ChartSeries, JobId, JobStatus, MonitorState, SessionState, StatusMessage};

/// Everything a renderer needs to draw the GA progress view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonitorViewModel {
    pub session: SessionState,
    pub job_id: Option<JobId>,
    pub job_status: Option<JobStatus>,
    /// `Generation: n/total` of the latest rendered snapshot.
    pub generation_label: Option<String>,
    pub generation_percent: f64,
    pub best_fitness: String,
    pub average_fitness: String,
    pub worst_fitness: String,
    pub chart: ChartSeries,
    pub message: Option<StatusMessage>,
    pub run_enabled: bool,
    pub stop_visible: bool,
    pub batches_rendered: u64,
}

impl MonitorViewModel {
    pub(crate) fn from_state(state: &MonitorState) -> Self {
        let latest = state.latest();
        let fitness = latest.and_then(|snapshot| snapshot.fitness);
        let format_value = |value: Option<f64>| format!("{:.2}", value.unwrap_or(0.0));

        Self {
            session: state.session(),
            job_id: state.job().map(|job| job.id().clone()),
            job_status: state.job().map(|job| job.status()),
            generation_label: latest.map(|snapshot| {
                format!(
                    "Generation: {}/{}",
                    snapshot.current_generation, snapshot.total_generations
                )
            }),
            generation_percent: latest.map_or(0.0, |snapshot| snapshot.generation_percent()),
            best_fitness: format_value(fitness.map(|f| f.best)),
            average_fitness: format_value(fitness.map(|f| f.average)),
            worst_fitness: format_value(fitness.map(|f| f.worst)),
            chart: state.chart().clone(),
            message: state.message().cloned(),
            run_enabled: state.session() == SessionState::Idle,
            stop_visible: state.session() != SessionState::Idle,
            batches_rendered: state.batches_rendered(),
        }
    }
}
