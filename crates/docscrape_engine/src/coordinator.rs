use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use docscrape_core::{
    FailureKind, PhaseScript, ProgressPhase, RequestId, ScrapeResult, ScrapeTarget, URL_REQUIRED,
};
use docscrape_logging::{scrape_debug, scrape_info, scrape_warn};
use tokio_util::sync::CancellationToken;

use crate::ticker::PhaseTicker;
use crate::{BackendClient, EngineEvent, ProgressSink};

/// Runs scrape requests against the backend and turns every outcome into a
/// [`ScrapeResult`].
///
/// The coordinator does not look at the login session; gating happens before
/// a request reaches it. Each call carries its own request identity and phase
/// ticker, so overlapping calls never share progress or results.
pub struct ScrapeCoordinator {
    backend: BackendClient,
    script: PhaseScript,
    next_id: AtomicU64,
    tickers: Mutex<HashMap<RequestId, CancellationToken>>,
}

impl ScrapeCoordinator {
    pub fn new(backend: BackendClient, script: PhaseScript) -> Self {
        Self {
            backend,
            script,
            next_id: AtomicU64::new(1),
            tickers: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `target` under a freshly allocated request id.
    ///
    /// Do not mix with [`ScrapeCoordinator::execute_as`] on the same instance;
    /// the two id spaces are independent.
    pub async fn execute(&self, target: &ScrapeTarget, sink: Arc<dyn ProgressSink>) -> ScrapeResult {
        let request_id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.execute_as(request_id, target, sink).await
    }

    /// Runs `target` under an id issued by the caller's request ledger.
    pub async fn execute_as(
        &self,
        request_id: RequestId,
        target: &ScrapeTarget,
        sink: Arc<dyn ProgressSink>,
    ) -> ScrapeResult {
        let Some(url) = target.trimmed_url() else {
            scrape_debug!("request {} rejected: empty url", request_id);
            return ScrapeResult::failed(
                target.kind,
                target.url.clone(),
                FailureKind::InvalidTarget,
                URL_REQUIRED,
            );
        };

        scrape_info!("request {} scraping {} via {}", request_id, url, target.kind);
        let ticker = PhaseTicker::start(request_id, &self.script, sink.clone());
        self.register(request_id, ticker.token());

        let response = self.backend.scrape(target.kind, url).await;

        self.unregister(request_id);
        let superseded = ticker.is_cancelled();
        ticker.stop().await;

        let emit = |phase| {
            if !superseded {
                sink.emit(EngineEvent::Phase { request_id, phase });
            }
        };

        match response {
            Ok(response) if response.success => {
                emit(ProgressPhase::Processing);
                let items = response
                    .articles
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect::<Vec<_>>();
                let markdown = response.markdown_content.unwrap_or_default();
                scrape_info!(
                    "request {} done: {} bytes markdown, {} articles",
                    request_id,
                    markdown.len(),
                    items.len()
                );
                let result =
                    ScrapeResult::succeeded(target.kind, url, markdown, items, response.message);
                emit(ProgressPhase::Completed);
                result
            }
            Ok(response) => {
                let message = response.message.unwrap_or_default();
                scrape_warn!("request {} refused: {}", request_id, message);
                ScrapeResult::failed(target.kind, url, FailureKind::Refused, message)
            }
            Err(err) => {
                scrape_warn!("request {} failed: {}", request_id, err);
                ScrapeResult::failed(target.kind, url, err.failure_kind(), err.to_string())
            }
        }
    }

    /// Stops the phase timer of a superseded request. The backend call itself
    /// keeps running; only its progress output is silenced.
    pub fn cancel_phases(&self, request_id: RequestId) -> bool {
        let token = self.lock_tickers().remove(&request_id);
        match token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.lock_tickers().len()
    }

    fn register(&self, request_id: RequestId, token: CancellationToken) {
        self.lock_tickers().insert(request_id, token);
    }

    fn unregister(&self, request_id: RequestId) {
        self.lock_tickers().remove(&request_id);
    }

    fn lock_tickers(&self) -> std::sync::MutexGuard<'_, HashMap<RequestId, CancellationToken>> {
        self.tickers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
