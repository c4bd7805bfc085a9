use std::time::Duration;

use docscrape_core::{Effect, HealthStatus, Msg};
use docscrape_engine::{EngineError, EngineEvent, EngineHandle, EngineSettings};
use docscrape_logging::{scrape_debug, scrape_info};

/// Hands core effects to the engine and turns engine events back into
/// messages for the update loop.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        scrape_info!("engine starting against {}", settings.transport.base_url);
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            scrape_debug!("effect {:?}", effect);
            self.engine.dispatch(effect);
        }
    }

    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Phase { request_id, phase } => Msg::PhaseReached { request_id, phase },
        EngineEvent::HealthChecked(Ok(())) => Msg::HealthChecked(HealthStatus::Reachable),
        EngineEvent::HealthChecked(Err(err)) => {
            Msg::HealthChecked(HealthStatus::Unreachable(err.to_string()))
        }
        EngineEvent::LaunchFinished { ticket, outcome } => Msg::LaunchFinished { ticket, outcome },
        EngineEvent::VerifyFinished { ticket, outcome } => Msg::VerifyFinished { ticket, outcome },
        EngineEvent::ScrapeFinished { request_id, result } => {
            Msg::ScrapeFinished { request_id, result }
        }
    }
}
