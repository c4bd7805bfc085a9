use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use crate::{ProgressPhase, ScrapeTarget};

/// Identity of one scrape call. Issued in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub id: RequestId,
    pub target: ScrapeTarget,
    pub started_at: Instant,
    pub phase: ProgressPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Begun {
    pub id: RequestId,
    /// Older requests still in flight; their phase timers should stop.
    pub superseded: Vec<RequestId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No later-issued request has been applied yet; the result may be shown.
    Current(ScrapeRequest),
    /// A later-issued request already resolved; discard this result.
    Superseded(ScrapeRequest),
    /// Not in flight (already resolved or never issued).
    Unknown,
}

/// Ledger of in-flight scrape requests, keyed by request identity.
///
/// Requests are superseded, never queued: the phase shown is always the one
/// of the most recently issued request, and a result is only applied if no
/// later-issued request has been applied before it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeDesk {
    next_id: u64,
    in_flight: BTreeMap<RequestId, ScrapeRequest>,
    latest_issued: Option<RequestId>,
    last_applied: Option<RequestId>,
}

impl ScrapeDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, target: ScrapeTarget, now: Instant) -> Begun {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        let superseded = self.in_flight.keys().copied().collect();
        self.in_flight.insert(
            id,
            ScrapeRequest {
                id,
                target,
                started_at: now,
                phase: ProgressPhase::Initializing,
            },
        );
        self.latest_issued = Some(id);
        Begun { id, superseded }
    }

    /// Moves the latest request forward to `phase`. Returns false when the
    /// update belongs to a superseded request or would move backwards.
    pub fn advance(&mut self, id: RequestId, phase: ProgressPhase) -> bool {
        if self.latest_issued != Some(id) {
            return false;
        }
        match self.in_flight.get_mut(&id) {
            Some(request) if phase > request.phase => {
                request.phase = phase;
                true
            }
            _ => false,
        }
    }

    pub fn resolve(&mut self, id: RequestId) -> Resolution {
        let Some(request) = self.in_flight.remove(&id) else {
            return Resolution::Unknown;
        };
        if self.last_applied.is_some_and(|applied| applied > id) {
            return Resolution::Superseded(request);
        }
        self.last_applied = Some(id);
        Resolution::Current(request)
    }

    /// The most recently issued request, while it is still in flight.
    pub fn active(&self) -> Option<&ScrapeRequest> {
        self.latest_issued.and_then(|id| self.in_flight.get(&id))
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}
