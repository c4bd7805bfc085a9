use crate::{FailureKind, HealthStatus, ProgressPhase, RequestId, SessionStatus, SourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionStatus,
    /// A launch or verify call is in flight.
    pub session_busy: bool,
    pub session_message: Option<String>,
    pub health: HealthStatus,
    pub status_line: Option<String>,
    pub active_request: Option<ActiveRequestView>,
    pub in_flight: usize,
    pub result: Option<ResultView>,
    pub last_error: Option<String>,
    pub scrape_failure: Option<FailureKind>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRequestView {
    pub request_id: RequestId,
    pub source: SourceKind,
    pub url: String,
    pub phase: ProgressPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub source: SourceKind,
    pub url: String,
    pub markdown_bytes: usize,
    pub item_count: usize,
}
