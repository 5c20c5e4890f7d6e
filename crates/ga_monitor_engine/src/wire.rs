use ga_monitor_core::{format_date, DateRange, Fitness, GaParameters, JobId, ProgressSnapshot};
use serde::Deserialize;
use serde_json::{json, Value};
use url::form_urlencoded;

use crate::{ApiError, ApiFailureKind};

const START: &str = "/ga/start";
const STATUS: &str = "/ga/status";
const STOP: &str = "/ga/stop";

fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(name, value)| (*name, value.as_str())))
        .finish();
    format!("{path}?{query}")
}

pub(crate) fn start_endpoint(parameters: &GaParameters) -> String {
    with_query(START, &parameters.query_pairs())
}

pub(crate) fn status_endpoint(job_id: &JobId) -> String {
    with_query(STATUS, &[("visualizationId", job_id.to_string())])
}

pub(crate) fn stop_endpoint(job_id: &JobId) -> String {
    with_query(STOP, &[("visualizationId", job_id.to_string())])
}

pub(crate) fn start_body(range: &DateRange) -> Value {
    json!({
        "startDate": format_date(range.start()),
        "endDate": format_date(range.end()),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct StartResponse {
    pub visualization_id: Option<String>,
    pub message: Option<String>,
}

impl StartResponse {
    pub(crate) fn from_value(value: Value) -> Result<Self, ApiError> {
        if value.is_null() {
            return Err(ApiError::new(
                ApiFailureKind::InvalidBody,
                "empty start response",
            ));
        }
        serde_json::from_value(value)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidBody, err.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FitnessData {
    best: Option<f64>,
    average: Option<f64>,
    worst: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct StatusResponse {
    pub active: bool,
    pub completed: bool,
    pub current_generation: Option<u32>,
    pub total_generations: Option<u32>,
    fitness_data: Option<FitnessData>,
    pub message: Option<String>,
}

impl StatusResponse {
    /// An empty body reads as an inactive job.
    pub(crate) fn from_value(value: Value) -> Result<Self, ApiError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidBody, err.to_string()))
    }

    /// `None` when the job is no longer active on the server.
    pub(crate) fn into_snapshot(self) -> Option<ProgressSnapshot> {
        if !self.active {
            return None;
        }
        let fitness = self.fitness_data.and_then(|data| {
            Some(Fitness {
                best: data.best?,
                average: data.average?,
                worst: data.worst?,
            })
        });
        Some(ProgressSnapshot {
            current_generation: self.current_generation.unwrap_or(0),
            total_generations: self.total_generations.unwrap_or(0),
            fitness,
            completed: self.completed,
        })
    }
}
