use std::sync::Arc;

use docscrape_core::{PhaseScript, RequestId};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, ProgressSink};

/// Emits the scripted progress phases of one request until cancelled.
///
/// Dropping the ticker cancels it. [`PhaseTicker::stop`] additionally waits
/// for the task, so no phase of this request is emitted after it returns.
pub struct PhaseTicker {
    request_id: RequestId,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PhaseTicker {
    /// Must be called from within a tokio runtime.
    pub fn start(request_id: RequestId, script: &PhaseScript, sink: Arc<dyn ProgressSink>) -> Self {
        let token = CancellationToken::new();
        let steps = script.steps().to_vec();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let started = Instant::now();
            for step in steps {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => return,
                    _ = tokio::time::sleep_until(started + step.at) => {}
                }
                sink.emit(EngineEvent::Phase {
                    request_id,
                    phase: step.phase,
                });
            }
        });
        Self {
            request_id,
            token,
            handle: Some(handle),
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for PhaseTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
