//! GA monitor core: pure job-tracking state machine, batching and view-model helpers.
mod batcher;
mod effect;
mod job;
mod msg;
mod snapshot;
mod state;
mod update;
mod validation;
mod view_model;

pub use batcher::{UpdateBatcher, BATCH_SIZE};
pub use effect::Effect;
pub use job::{Job, JobId, JobStatus, TransitionError};
pub use msg::Msg;
pub use snapshot::{Batch, Fitness, ProgressSnapshot};
pub use state::{ChartSeries, MessageKind, MonitorState, SessionState, StatusMessage};
pub use update::update;
pub use validation::{format_date, DateRange, GaParameters, RunRequest, ValidationError, DATE_FORMAT};
pub use view_model::MonitorViewModel;
