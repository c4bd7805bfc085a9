//! Manual-login session state machine.
//!
//! The operator logs in through a browser window opened by the backend; this
//! side only tracks where in that flow we are. Each external call is issued
//! with a [`SessionTicket`] stamped with the current generation. `cancel`
//! bumps the generation, so a response arriving after a cancel no longer
//! matches and is discarded instead of applied.
use std::fmt;

use crate::CallOutcome;

pub const AUTH_NOT_DETECTED: &str = "authentication not detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Unauthenticated,
    BrowserLaunched,
    Verifying,
    Authenticated,
}

impl SessionStatus {
    pub fn label(self) -> &'static str {
        match self {
            SessionStatus::Unauthenticated => "not signed in",
            SessionStatus::BrowserLaunched => "waiting for browser login",
            SessionStatus::Verifying => "verifying",
            SessionStatus::Authenticated => "authenticated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCall {
    Launch,
    Verify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTicket {
    pub call: SessionCall,
    pub generation: u64,
}

/// A transition the state machine refused to start; nothing was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    NotLaunched,
    AlreadyAuthenticated,
    VerificationInFlight,
}

impl fmt::Display for SessionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionRejection::NotLaunched => write!(f, "launch the login browser before verifying"),
            SessionRejection::AlreadyAuthenticated => write!(f, "session is already authenticated"),
            SessionRejection::VerificationInFlight => write!(f, "verification already in progress"),
        }
    }
}

impl std::error::Error for SessionRejection {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Yes,
    /// Ticket from a cancelled flow; state left untouched.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    status: SessionStatus,
    generation: u64,
    launch_pending: bool,
    message: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn launch_pending(&self) -> bool {
        self.launch_pending
    }

    pub fn begin_launch(&mut self) -> Result<SessionTicket, SessionRejection> {
        match self.status {
            SessionStatus::Unauthenticated | SessionStatus::BrowserLaunched => {
                self.launch_pending = true;
                self.message = None;
                Ok(self.ticket(SessionCall::Launch))
            }
            SessionStatus::Verifying => Err(self.reject(SessionRejection::VerificationInFlight)),
            SessionStatus::Authenticated => {
                Err(self.reject(SessionRejection::AlreadyAuthenticated))
            }
        }
    }

    pub fn apply_launch(&mut self, ticket: SessionTicket, outcome: CallOutcome) -> Applied {
        if !self.is_current(ticket, SessionCall::Launch) {
            return Applied::Stale;
        }
        self.launch_pending = false;
        match outcome {
            CallOutcome::Accepted { .. } => {
                // A relaunch from BrowserLaunched lands on the same state.
                if self.status == SessionStatus::Unauthenticated {
                    self.status = SessionStatus::BrowserLaunched;
                }
                self.message = None;
            }
            CallOutcome::Refused { message } => {
                self.message = Some(message.unwrap_or_else(|| "failed to launch browser".into()));
            }
            CallOutcome::Failed { message, .. } => {
                self.message = Some(message);
            }
        }
        Applied::Yes
    }

    pub fn begin_verify(&mut self) -> Result<SessionTicket, SessionRejection> {
        match self.status {
            SessionStatus::BrowserLaunched => {
                self.status = SessionStatus::Verifying;
                self.message = None;
                Ok(self.ticket(SessionCall::Verify))
            }
            SessionStatus::Unauthenticated => Err(self.reject(SessionRejection::NotLaunched)),
            SessionStatus::Verifying => Err(self.reject(SessionRejection::VerificationInFlight)),
            SessionStatus::Authenticated => {
                Err(self.reject(SessionRejection::AlreadyAuthenticated))
            }
        }
    }

    pub fn apply_verify(&mut self, ticket: SessionTicket, outcome: CallOutcome) -> Applied {
        if !self.is_current(ticket, SessionCall::Verify) || self.status != SessionStatus::Verifying
        {
            return Applied::Stale;
        }
        match outcome {
            CallOutcome::Accepted { .. } => {
                self.status = SessionStatus::Authenticated;
                self.message = None;
            }
            CallOutcome::Refused { message } => {
                self.status = SessionStatus::BrowserLaunched;
                self.message = Some(
                    message
                        .filter(|text| !text.trim().is_empty())
                        .unwrap_or_else(|| AUTH_NOT_DETECTED.to_string()),
                );
            }
            CallOutcome::Failed { message, .. } => {
                self.status = SessionStatus::BrowserLaunched;
                self.message = Some(format!("verification failed: {message}"));
            }
        }
        Applied::Yes
    }

    /// Returns to `Unauthenticated` and invalidates outstanding tickets.
    /// Has no effect on an authenticated session.
    pub fn cancel(&mut self) -> bool {
        if self.status == SessionStatus::Authenticated {
            return false;
        }
        self.status = SessionStatus::Unauthenticated;
        self.generation += 1;
        self.launch_pending = false;
        self.message = None;
        true
    }

    /// Back to `Unauthenticated` from any state, including `Authenticated`.
    /// The generation keeps counting so tickets issued before the reset stay
    /// stale.
    pub fn reset(&mut self) {
        self.status = SessionStatus::Unauthenticated;
        self.generation += 1;
        self.launch_pending = false;
        self.message = None;
    }

    fn ticket(&self, call: SessionCall) -> SessionTicket {
        SessionTicket {
            call,
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: SessionTicket, call: SessionCall) -> bool {
        ticket.call == call && ticket.generation == self.generation
    }

    fn reject(&mut self, rejection: SessionRejection) -> SessionRejection {
        self.message = Some(rejection.to_string());
        rejection
    }
}
