use std::sync::Arc;

use docscrape_core::{scrape_route, CallOutcome, Endpoint, SourceKind};
use docscrape_logging::{scrape_debug, scrape_warn};
use serde_json::json;

use crate::transport::{ReqwestTransport, Transport, TransportError, TransportSettings};
use crate::wire::{AckResponse, ScrapeResponse};

/// Typed operations of the backend contract on top of a [`Transport`].
#[derive(Clone)]
pub struct BackendClient {
    transport: Arc<dyn Transport>,
}

impl BackendClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn from_settings(settings: TransportSettings) -> Result<Self, TransportError> {
        Ok(Self::new(Arc::new(ReqwestTransport::new(settings)?)))
    }

    /// Any 2xx reply counts as healthy; the body is not inspected.
    pub async fn health(&self) -> Result<(), TransportError> {
        self.transport.call(Endpoint::HEALTH, None).await.map(|_| ())
    }

    pub async fn launch_login(&self) -> CallOutcome {
        self.ack(Endpoint::LAUNCH_LOGIN).await
    }

    pub async fn check_auth(&self) -> CallOutcome {
        self.ack(Endpoint::CHECK_AUTH).await
    }

    pub async fn scrape(&self, kind: SourceKind, url: &str) -> Result<ScrapeResponse, TransportError> {
        let route = scrape_route(kind);
        let mut body = serde_json::Map::new();
        body.insert(route.field.key().to_string(), json!(url));
        scrape_debug!("POST {} source={} url={}", route.endpoint.path, kind, url);
        self.transport
            .call(route.endpoint, Some(serde_json::Value::Object(body)))
            .await?
            .decode()
    }

    async fn ack(&self, endpoint: Endpoint) -> CallOutcome {
        scrape_debug!("{:?} {}", endpoint.method, endpoint.path);
        let reply = match self.transport.call(endpoint, None).await {
            Ok(reply) => reply,
            Err(err) => return failed(endpoint, err),
        };
        match reply.decode::<AckResponse>() {
            Ok(ack) => ack.into(),
            Err(err) => failed(endpoint, err),
        }
    }
}

fn failed(endpoint: Endpoint, err: TransportError) -> CallOutcome {
    scrape_warn!("{} failed: {}", endpoint.path, err);
    CallOutcome::Failed {
        kind: err.failure_kind(),
        message: err.to_string(),
    }
}
