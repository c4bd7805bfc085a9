//! Docscrape core: pure state machines for the login session, in-flight
//! scrape requests and the result sink, composed by a message/update loop.
mod effect;
mod msg;
mod phase;
mod request;
mod result;
mod route;
mod session;
mod sink;
mod source;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use phase::{PhaseScript, PhaseStep, ProgressPhase};
pub use request::{Begun, RequestId, Resolution, ScrapeDesk, ScrapeRequest};
pub use result::{Article, CallOutcome, FailureKind, ScrapeResult};
pub use route::{scrape_route, Endpoint, Method, ScrapeRoute, UrlField};
pub use session::{
    Applied, Session, SessionCall, SessionRejection, SessionStatus, SessionTicket,
    AUTH_NOT_DETECTED,
};
pub use sink::ResultSink;
pub use source::{ScrapeTarget, SourceFamily, SourceKind, UnknownSource};
pub use state::{AppState, HealthStatus};
pub use update::{update, URL_REQUIRED};
pub use view_model::{ActiveRequestView, AppViewModel, ResultView};
