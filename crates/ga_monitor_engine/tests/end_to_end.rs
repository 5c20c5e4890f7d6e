mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{active_status, completed_status, init_logging};
use futures_util::StreamExt;
use ga_monitor_core::{JobId, UpdateBatcher};
use ga_monitor_engine::{
    ApiSettings, JobLauncher, JobSession, LaunchParams, MemoryTokenStore, NoLoginRedirect,
    PollingLoop, ReqwestApiClient,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers with each body in turn, repeating the last one.
struct StatusSequence {
    bodies: Vec<Value>,
    next: AtomicUsize,
}

impl Respond for StatusSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let body = &self.bodies[index.min(self.bodies.len() - 1)];
        ResponseTemplate::new(200).set_body_json(body)
    }
}

#[tokio::test]
async fn launch_then_poll_to_completion() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ga/start"))
        .and(body_json(json!({ "startDate": "2024-01-01", "endDate": "2024-01-07" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "visualizationId": "v1",
            "message": "GA process started"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ga/status"))
        .and(query_param("visualizationId", "v1"))
        .respond_with(StatusSequence {
            bodies: vec![
                active_status(1, 4),
                active_status(2, 4),
                active_status(3, 4),
                completed_status(4),
            ],
            next: AtomicUsize::new(0),
        })
        .expect(4)
        .mount(&server)
        .await;

    let settings = ApiSettings {
        base_url: format!("{}/api", server.uri()),
        ..ApiSettings::default()
    };
    let api = Arc::new(
        ReqwestApiClient::new(
            &settings,
            Arc::new(MemoryTokenStore::with_token("t")),
            Arc::new(NoLoginRedirect),
        )
        .expect("client"),
    );
    let mut session = JobSession::new();

    let handle = JobLauncher::new(api.clone())
        .launch(&mut session, &LaunchParams::new("2024-01-01", "2024-01-07"))
        .await
        .expect("launch ok");
    assert_eq!(handle.id(), &JobId::new("v1"));

    let snapshots = PollingLoop::new(api, Duration::from_millis(5))
        .start(&handle)
        .map(|item| item.expect("snapshot"))
        .collect::<Vec<_>>()
        .await;

    assert_eq!(snapshots.len(), 4);
    assert_eq!(
        snapshots.iter().map(|s| s.current_generation).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert!(snapshots[3].completed);
    assert!(snapshots[..3].iter().all(|s| !s.completed));
    assert!(session.active().is_none());

    // The completed snapshot flushes the short batch straight away.
    let mut batcher = UpdateBatcher::default();
    let batches = snapshots
        .into_iter()
        .filter_map(|snapshot| batcher.push(snapshot))
        .collect::<Vec<_>>();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 4);
    assert!(batches[0].is_final());
}
