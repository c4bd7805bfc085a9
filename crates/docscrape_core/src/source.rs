use std::fmt;
use std::str::FromStr;

/// Documentation source a scrape request is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// iSAMS support knowledge base (category pages, returns articles).
    IsamsSupport,
    /// Toddle support centre.
    ToddleSupport,
    /// Odoo 18 official documentation.
    OdooDocs,
    /// promptingguide.ai.
    PromptingGuide,
    /// iSAMS developer documentation (ReadMe.io).
    IsamsDeveloper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFamily {
    /// Needs a signed-in browser session held by the backend.
    Credentialed,
    Public,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::IsamsSupport,
        SourceKind::ToddleSupport,
        SourceKind::OdooDocs,
        SourceKind::PromptingGuide,
        SourceKind::IsamsDeveloper,
    ];

    pub fn family(self) -> SourceFamily {
        match self {
            SourceKind::IsamsSupport | SourceKind::ToddleSupport => SourceFamily::Credentialed,
            SourceKind::OdooDocs | SourceKind::PromptingGuide | SourceKind::IsamsDeveloper => {
                SourceFamily::Public
            }
        }
    }

    /// Whether targets of this kind are gated on an authenticated session unless overridden.
    pub fn default_requires_session(self) -> bool {
        self.family() == SourceFamily::Credentialed
    }

    /// Stable identifier used on the command line and in export filenames.
    pub fn slug(self) -> &'static str {
        match self {
            SourceKind::IsamsSupport => "isams-support",
            SourceKind::ToddleSupport => "toddle-support",
            SourceKind::OdooDocs => "odoo-docs",
            SourceKind::PromptingGuide => "prompting-guide",
            SourceKind::IsamsDeveloper => "isams-developer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::IsamsSupport => "iSAMS Support",
            SourceKind::ToddleSupport => "Toddle Support",
            SourceKind::OdooDocs => "Odoo 18 Docs",
            SourceKind::PromptingGuide => "Prompting Guide",
            SourceKind::IsamsDeveloper => "iSAMS Developer Docs",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSource(pub String);

impl fmt::Display for UnknownSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = SourceKind::ALL.iter().map(|kind| kind.slug()).collect();
        write!(f, "unknown source '{}' (expected one of: {})", self.0, known.join(", "))
    }
}

impl std::error::Error for UnknownSource {}

impl FromStr for SourceKind {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// Immutable description of what to scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTarget {
    pub kind: SourceKind,
    pub url: String,
    /// Session gate for this target; defaults to the kind's family.
    pub requires_session: bool,
}

impl ScrapeTarget {
    pub fn new(kind: SourceKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            requires_session: kind.default_requires_session(),
        }
    }

    pub fn with_session_gate(mut self, requires_session: bool) -> Self {
        self.requires_session = requires_session;
        self
    }

    /// URL with surrounding whitespace removed; `None` if nothing is left.
    pub fn trimmed_url(&self) -> Option<&str> {
        let url = self.url.trim();
        (!url.is_empty()).then_some(url)
    }
}
