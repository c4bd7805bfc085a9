use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use docscrape_core::{Effect, PhaseScript};
use docscrape_logging::{scrape_debug, scrape_error};

use crate::{
    BackendClient, ChannelProgressSink, EngineEvent, ProgressSink, ScrapeCoordinator,
    TransportError, TransportSettings,
};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub transport: TransportSettings,
    pub phases: PhaseScript,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Executes core effects on a background tokio runtime and reports back
/// through [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<Effect>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        let backend = BackendClient::from_settings(settings.transport)?;
        Self::with_backend(backend, settings.phases)
    }

    pub fn with_backend(backend: BackendClient, phases: PhaseScript) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("docscrape-engine")
            .enable_all()
            .build()?;
        let coordinator = Arc::new(ScrapeCoordinator::new(backend.clone(), phases));

        thread::Builder::new()
            .name("docscrape-engine-cmd".into())
            .spawn(move || {
                while let Ok(effect) = cmd_rx.recv() {
                    let worker = Worker {
                        backend: backend.clone(),
                        coordinator: coordinator.clone(),
                        event_tx: event_tx.clone(),
                    };
                    runtime.spawn(async move { worker.run(effect).await });
                }
                scrape_debug!("engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn dispatch(&self, effect: Effect) {
        if self.cmd_tx.send(effect).is_err() {
            scrape_error!("engine thread is gone; effect dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct Worker {
    backend: BackendClient,
    coordinator: Arc<ScrapeCoordinator>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl Worker {
    async fn run(self, effect: Effect) {
        let event = match effect {
            Effect::CheckHealth => EngineEvent::HealthChecked(self.backend.health().await),
            Effect::LaunchLogin { ticket } => EngineEvent::LaunchFinished {
                ticket,
                outcome: self.backend.launch_login().await,
            },
            Effect::CheckAuth { ticket } => EngineEvent::VerifyFinished {
                ticket,
                outcome: self.backend.check_auth().await,
            },
            Effect::Scrape { request_id, target } => {
                let sink: Arc<dyn ProgressSink> =
                    Arc::new(ChannelProgressSink::new(self.event_tx.clone()));
                let result = self.coordinator.execute_as(request_id, &target, sink).await;
                EngineEvent::ScrapeFinished { request_id, result }
            }
            Effect::CancelPhases { request_id } => {
                self.coordinator.cancel_phases(request_id);
                return;
            }
        };
        let _ = self.event_tx.send(event);
    }
}
