use std::fmt;

use crate::SourceKind;

/// Structured article returned alongside the Markdown for knowledge-base scrapes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    pub module_name: String,
    pub category_level_1: String,
    pub category_level_2: String,
    pub article_name: String,
    pub article_url: String,
    pub content: String,
    pub related_articles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Empty URL; rejected before any backend call.
    InvalidTarget,
    /// Session-gated target while the session is not authenticated.
    SessionRequired,
    /// Backend answered `success: false`.
    Refused,
    /// Backend answered with a non-2xx status.
    BackendStatus(u16),
    /// Backend origin could not be reached.
    Unreachable,
    /// Backend answered with a body that could not be decoded.
    Malformed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidTarget => write!(f, "invalid target"),
            FailureKind::SessionRequired => write!(f, "session required"),
            FailureKind::Refused => write!(f, "refused by backend"),
            FailureKind::BackendStatus(code) => write!(f, "backend status {code}"),
            FailureKind::Unreachable => write!(f, "backend unreachable"),
            FailureKind::Malformed => write!(f, "malformed response"),
        }
    }
}

/// Outcome of a session call (launch or verify) as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Accepted { message: Option<String> },
    Refused { message: Option<String> },
    /// Transport-level failure, already rendered to text.
    Failed { kind: FailureKind, message: String },
}

impl CallOutcome {
    pub fn accepted() -> Self {
        CallOutcome::Accepted { message: None }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        CallOutcome::Refused {
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeResult {
    pub source: SourceKind,
    pub url: String,
    pub markdown: String,
    pub items: Vec<Article>,
    pub success: bool,
    pub message: String,
    pub failure: Option<FailureKind>,
}

impl ScrapeResult {
    pub fn succeeded(
        source: SourceKind,
        url: impl Into<String>,
        markdown: String,
        items: Vec<Article>,
        message: Option<String>,
    ) -> Self {
        Self {
            source,
            url: url.into(),
            markdown,
            items,
            success: true,
            message: message.unwrap_or_default(),
            failure: None,
        }
    }

    pub fn failed(
        source: SourceKind,
        url: impl Into<String>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.to_string()
        } else {
            message
        };
        Self {
            source,
            url: url.into(),
            markdown: String::new(),
            items: Vec::new(),
            success: false,
            message,
            failure: Some(kind),
        }
    }
}
