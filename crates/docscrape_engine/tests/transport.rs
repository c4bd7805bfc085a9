use std::time::Duration;

use docscrape_core::{Endpoint, FailureKind};
use docscrape_engine::{ReqwestTransport, Transport, TransportError, TransportSettings};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(TransportSettings {
        base_url: server.uri(),
        ..TransportSettings::default()
    })
    .expect("valid base url")
}

#[tokio::test]
async fn posts_json_payload_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape-odoo"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"url": "https://www.odoo.com/documentation/18.0/"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = transport_for(&server)
        .call(
            Endpoint::post("/scrape-odoo"),
            Some(json!({"url": "https://www.odoo.com/documentation/18.0/"})),
        )
        .await
        .expect("call ok");

    assert_eq!(reply.status, 200);
    let value: serde_json::Value = reply.decode().unwrap();
    assert_eq!(value, json!({"success": true}));
}

#[tokio::test]
async fn non_success_status_carries_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "Category page not found"})),
        )
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .call(Endpoint::post("/scrape"), Some(json!({"category_url": "x"})))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        TransportError::Backend {
            status: 500,
            detail: "Category page not found".to_string()
        }
    );
    assert_eq!(err.failure_kind(), FailureKind::BackendStatus(500));
}

#[tokio::test]
async fn unreachable_origin_is_reported_as_unreachable() {
    let transport = ReqwestTransport::new(TransportSettings {
        base_url: "http://127.0.0.1:1".to_string(),
        connect_timeout: Duration::from_millis(500),
        ..TransportSettings::default()
    })
    .unwrap();

    let err = transport.call(Endpoint::HEALTH, None).await.unwrap_err();

    assert!(matches!(err, TransportError::Unreachable(_)), "{err:?}");
    assert_eq!(err.failure_kind(), FailureKind::Unreachable);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/check-auth"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"success": true})),
        )
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(TransportSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..TransportSettings::default()
    })
    .unwrap();

    let err = transport.call(Endpoint::CHECK_AUTH, None).await.unwrap_err();
    assert!(matches!(err, TransportError::Unreachable(ref msg) if msg.starts_with("timed out")));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(TransportSettings {
        base_url: server.uri(),
        max_response_bytes: 10,
        ..TransportSettings::default()
    })
    .unwrap();

    let err = transport.call(Endpoint::HEALTH, None).await.unwrap_err();
    assert_eq!(err, TransportError::TooLarge { max_bytes: 10 });
}

#[tokio::test]
async fn oversized_error_body_still_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(4096)))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(TransportSettings {
        base_url: server.uri(),
        max_response_bytes: 10,
        ..TransportSettings::default()
    })
    .unwrap();

    let err = transport
        .call(Endpoint::post("/scrape"), Some(json!({"category_url": "x"})))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TransportError::Backend {
            status: 500,
            detail: "x".repeat(10)
        }
    );
    assert_eq!(err.failure_kind(), FailureKind::BackendStatus(500));
}

#[tokio::test]
async fn non_json_success_body_fails_to_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/check-auth"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let reply = transport_for(&server)
        .call(Endpoint::CHECK_AUTH, None)
        .await
        .expect("2xx reply");

    let err = reply.decode::<serde_json::Value>().unwrap_err();
    assert!(matches!(err, TransportError::Malformed(_)));
}
