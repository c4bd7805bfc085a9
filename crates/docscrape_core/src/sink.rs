use crate::ScrapeResult;

/// Holds the last stored scrape result. Last write wins; nothing is merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSink {
    latest: Option<ScrapeResult>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, result: ScrapeResult) {
        self.latest = Some(result);
    }

    pub fn get(&self) -> Option<&ScrapeResult> {
        self.latest.as_ref()
    }

    pub fn clear(&mut self) -> Option<ScrapeResult> {
        self.latest.take()
    }
}
