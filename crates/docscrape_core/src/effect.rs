use crate::{RequestId, ScrapeTarget, SessionTicket};

/// Side effects requested by `update`, executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckHealth,
    LaunchLogin { ticket: SessionTicket },
    CheckAuth { ticket: SessionTicket },
    Scrape {
        request_id: RequestId,
        target: ScrapeTarget,
    },
    /// Stop the phase timer of a request that is no longer the latest.
    CancelPhases { request_id: RequestId },
}
