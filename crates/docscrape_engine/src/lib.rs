//! Docscrape engine: backend transport, login and scrape calls, and
//! effect execution.
mod backend;
mod coordinator;
mod engine;
mod export;
mod ticker;
mod transport;
mod types;
mod wire;

pub use backend::BackendClient;
pub use coordinator::ScrapeCoordinator;
pub use engine::{EngineError, EngineHandle, EngineSettings};
pub use export::{
    ensure_output_dir, export_result, export_stem, render_document, write_atomic, ExportError,
    ExportSummary,
};
pub use ticker::PhaseTicker;
pub use transport::{ReqwestTransport, Reply, Transport, TransportError, TransportSettings};
pub use types::{ChannelProgressSink, EngineEvent, ProgressSink};
pub use wire::{AckResponse, ArticleDto, ScrapeResponse};
