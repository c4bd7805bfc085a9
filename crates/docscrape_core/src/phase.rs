use std::time::Duration;

/// Status labels shown while a scrape is in flight.
///
/// The backend call is a single synchronous request, so these are scripted on
/// a timer rather than reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProgressPhase {
    Initializing,
    Navigating,
    Extracting,
    Processing,
    Completed,
}

impl ProgressPhase {
    pub fn label(self) -> &'static str {
        match self {
            ProgressPhase::Initializing => "Initializing scraper...",
            ProgressPhase::Navigating => "Navigating to target...",
            ProgressPhase::Extracting => "Extracting content...",
            ProgressPhase::Processing => "Processing content...",
            ProgressPhase::Completed => "Completed!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStep {
    /// Offset from the start of the request.
    pub at: Duration,
    pub phase: ProgressPhase,
}

/// Timer-driven part of the phase sequence. Offsets are non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseScript {
    steps: Vec<PhaseStep>,
}

impl PhaseScript {
    pub fn new(mut steps: Vec<PhaseStep>) -> Self {
        steps.sort_by_key(|step| (step.at, step.phase));
        Self { steps }
    }

    pub fn steps(&self) -> &[PhaseStep] {
        &self.steps
    }

    /// Same phases, offsets multiplied by `factor`; used to shorten tests.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .map(|step| PhaseStep {
                    at: step.at.mul_f64(factor),
                    phase: step.phase,
                })
                .collect(),
        }
    }
}

impl Default for PhaseScript {
    fn default() -> Self {
        Self::new(vec![
            PhaseStep {
                at: Duration::ZERO,
                phase: ProgressPhase::Initializing,
            },
            PhaseStep {
                at: Duration::from_secs(1),
                phase: ProgressPhase::Navigating,
            },
            PhaseStep {
                at: Duration::from_secs(3),
                phase: ProgressPhase::Extracting,
            },
        ])
    }
}
