use docscrape_core::{CallOutcome, ProgressPhase, RequestId, ScrapeResult, SessionTicket};

use crate::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Phase {
        request_id: RequestId,
        phase: ProgressPhase,
    },
    HealthChecked(Result<(), TransportError>),
    LaunchFinished {
        ticket: SessionTicket,
        outcome: CallOutcome,
    },
    VerifyFinished {
        ticket: SessionTicket,
        outcome: CallOutcome,
    },
    ScrapeFinished {
        request_id: RequestId,
        result: ScrapeResult,
    },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
