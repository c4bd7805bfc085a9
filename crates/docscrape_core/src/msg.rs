use std::time::Instant;

use crate::{CallOutcome, HealthStatus, ProgressPhase, RequestId, ScrapeResult, ScrapeTarget, SessionTicket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator asked whether the backend is reachable.
    HealthCheckRequested,
    /// Engine finished the connectivity probe.
    HealthChecked(HealthStatus),
    /// Operator asked the backend to open the login browser.
    LaunchRequested,
    LaunchFinished {
        ticket: SessionTicket,
        outcome: CallOutcome,
    },
    /// Operator says the browser login is done.
    VerifyRequested,
    VerifyFinished {
        ticket: SessionTicket,
        outcome: CallOutcome,
    },
    /// Operator abandoned the login flow ("cancel / retry").
    CancelRequested,
    /// Discard the session entirely, including an authenticated one.
    SessionReset,
    ScrapeRequested {
        target: ScrapeTarget,
        requested_at: Instant,
    },
    /// Scripted phase from a request's timer.
    PhaseReached {
        request_id: RequestId,
        phase: ProgressPhase,
    },
    ScrapeFinished {
        request_id: RequestId,
        result: ScrapeResult,
    },
    ResultCleared,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

impl Msg {
    pub fn scrape(target: ScrapeTarget) -> Self {
        Msg::ScrapeRequested {
            target,
            requested_at: Instant::now(),
        }
    }
}
