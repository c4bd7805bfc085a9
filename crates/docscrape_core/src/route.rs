//! Backend routes. Every `SourceKind` maps to exactly one scrape route; the
//! mapping is an exhaustive match so a new kind cannot compile without one.
use crate::SourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
}

impl Endpoint {
    pub const HEALTH: Endpoint = Endpoint::get("/");
    pub const LAUNCH_LOGIN: Endpoint = Endpoint::post("/launch-login");
    pub const CHECK_AUTH: Endpoint = Endpoint::get("/check-auth");

    pub const fn get(path: &'static str) -> Self {
        Self {
            method: Method::Get,
            path,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            method: Method::Post,
            path,
        }
    }
}

/// JSON field carrying the target URL in the scrape request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlField {
    CategoryUrl,
    Url,
}

impl UrlField {
    pub fn key(self) -> &'static str {
        match self {
            UrlField::CategoryUrl => "category_url",
            UrlField::Url => "url",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeRoute {
    pub endpoint: Endpoint,
    pub field: UrlField,
}

pub fn scrape_route(kind: SourceKind) -> ScrapeRoute {
    let (path, field) = match kind {
        SourceKind::IsamsSupport => ("/scrape", UrlField::CategoryUrl),
        SourceKind::ToddleSupport => ("/scrape-toddle", UrlField::Url),
        SourceKind::OdooDocs => ("/scrape-odoo", UrlField::Url),
        SourceKind::PromptingGuide => ("/scrape-prompting-guide", UrlField::Url),
        SourceKind::IsamsDeveloper => ("/scrape-isams-developer", UrlField::Url),
    };
    ScrapeRoute {
        endpoint: Endpoint::post(path),
        field,
    }
}
