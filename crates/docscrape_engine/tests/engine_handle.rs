use std::time::{Duration, Instant};

use docscrape_core::{
    Effect, PhaseScript, ProgressPhase, RequestId, ScrapeTarget, SessionCall, SessionTicket,
    SourceKind,
};
use docscrape_engine::{EngineEvent, EngineHandle, EngineSettings, TransportSettings};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> EngineHandle {
    EngineHandle::new(EngineSettings {
        transport: TransportSettings {
            base_url: server.uri(),
            ..TransportSettings::default()
        },
        phases: PhaseScript::default().scaled(0.01),
    })
    .expect("engine")
}

/// Collects events until `done` matches one or the deadline passes.
fn collect_until(
    engine: &EngineHandle,
    deadline: Duration,
    done: impl Fn(&EngineEvent) -> bool,
) -> Vec<EngineEvent> {
    let start = Instant::now();
    let mut events = Vec::new();
    while start.elapsed() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            let finished = done(&event);
            events.push(event);
            if finished {
                break;
            }
        }
    }
    events
}

#[tokio::test]
async fn health_check_reports_reachable_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.dispatch(Effect::CheckHealth);

    let event = tokio::task::spawn_blocking(move || engine.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(event, Some(EngineEvent::HealthChecked(Ok(()))));
}

#[tokio::test]
async fn launch_effect_reports_outcome_with_its_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/launch-login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let ticket = SessionTicket {
        call: SessionCall::Launch,
        generation: 4,
    };
    engine.dispatch(Effect::LaunchLogin { ticket });

    let event = tokio::task::spawn_blocking(move || engine.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap();
    match event {
        Some(EngineEvent::LaunchFinished { ticket: got, outcome }) => {
            assert_eq!(got, ticket);
            assert!(matches!(outcome, docscrape_core::CallOutcome::Accepted { .. }));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn scrape_effect_streams_phases_then_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape-odoo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(80))
                .set_body_json(json!({"success": true, "markdown_content": "# Done"})),
        )
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.dispatch(Effect::Scrape {
        request_id: RequestId(1),
        target: ScrapeTarget::new(SourceKind::OdooDocs, "https://www.odoo.com/documentation"),
    });

    let events = tokio::task::spawn_blocking(move || {
        collect_until(&engine, Duration::from_secs(5), |event| {
            matches!(event, EngineEvent::ScrapeFinished { .. })
        })
    })
    .await
    .unwrap();

    let phases: Vec<ProgressPhase> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Phase { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(phases.first(), Some(&ProgressPhase::Initializing));
    assert!(phases.contains(&ProgressPhase::Completed));

    match events.last() {
        Some(EngineEvent::ScrapeFinished { request_id, result }) => {
            assert_eq!(*request_id, RequestId(1));
            assert!(result.success);
            assert_eq!(result.markdown, "# Done");
        }
        other => panic!("unexpected last event: {other:?}"),
    }
}
