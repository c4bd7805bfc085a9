use crate::view_model::{ActiveRequestView, AppViewModel, ResultView};
use crate::{FailureKind, ResultSink, ScrapeDesk, ScrapeResult, Session};

/// Backend connectivity as last probed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HealthStatus {
    #[default]
    Unknown,
    Checking,
    Reachable,
    Unreachable(String),
}

/// Composition of the three independently owned state machines plus the
/// text shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) session: Session,
    pub(crate) desk: ScrapeDesk,
    pub(crate) sink: ResultSink,
    pub(crate) health: HealthStatus,
    pub(crate) status_line: Option<String>,
    pub(crate) last_error: Option<String>,
    /// Why the latest scrape request did not produce a result.
    pub(crate) scrape_failure: Option<FailureKind>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn desk(&self) -> &ScrapeDesk {
        &self.desk
    }

    pub fn result(&self) -> Option<&ScrapeResult> {
        self.sink.get()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session.status(),
            session_busy: self.session.launch_pending()
                || self.session.status() == crate::SessionStatus::Verifying,
            session_message: self.session.message().map(ToOwned::to_owned),
            health: self.health.clone(),
            status_line: self.status_line.clone(),
            active_request: self.desk.active().map(|request| ActiveRequestView {
                request_id: request.id,
                source: request.target.kind,
                url: request.target.url.clone(),
                phase: request.phase,
            }),
            in_flight: self.desk.in_flight_count(),
            result: self.sink.get().map(|result| ResultView {
                source: result.source,
                url: result.url.clone(),
                markdown_bytes: result.markdown.len(),
                item_count: result.items.len(),
            }),
            last_error: self.last_error.clone(),
            scrape_failure: self.scrape_failure.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
