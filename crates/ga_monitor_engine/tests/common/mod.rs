#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use ga_monitor_engine::{ApiError, ApiFailureKind, ApiRequest, ApiTransport, JobHandle};
use serde_json::{json, Value};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(monitor_logging::initialize_for_tests);
}

pub fn api_error(kind: ApiFailureKind, message: &str) -> ApiError {
    ApiError {
        kind,
        message: message.to_string(),
    }
}

pub fn active_status(generation: u32, total: u32) -> Value {
    json!({
        "active": true,
        "completed": false,
        "currentGeneration": generation,
        "totalGenerations": total,
        "fitnessData": {
            "best": 1000.0 - f64::from(generation),
            "average": 1100.0 - f64::from(generation),
            "worst": 1200.0 - f64::from(generation),
        }
    })
}

pub fn completed_status(generation: u32) -> Value {
    json!({
        "active": true,
        "completed": true,
        "currentGeneration": generation,
        "totalGenerations": generation,
        "fitnessData": { "best": 900.0, "average": 950.0, "worst": 990.0 }
    })
}

/// Transport answering from a fixed script and recording every request.
#[derive(Default)]
pub struct ScriptedApi {
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Option<Duration>,
    cancel_on_call: Mutex<Option<(usize, JobHandle)>>,
}

impl ScriptedApi {
    pub fn new(responses: Vec<Result<Value, ApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Cancels `handle` while the `nth` call (1-based) is in flight.
    pub fn cancel_during_call(&self, nth: usize, handle: JobHandle) {
        *self.cancel_on_call.lock().unwrap() = Some((nth, handle));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ApiTransport for ScriptedApi {
    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((nth, handle)) = self.cancel_on_call.lock().unwrap().as_ref() {
            if *nth == count {
                handle.cancel();
            }
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "active": false })))
    }
}
