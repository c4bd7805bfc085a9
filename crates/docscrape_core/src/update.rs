use crate::{
    AppState, Applied, Effect, FailureKind, HealthStatus, Msg, ProgressPhase, Resolution, ScrapeResult,
    ScrapeTarget,
};

pub const URL_REQUIRED: &str = "a target URL is required";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::HealthCheckRequested => {
            state.health = HealthStatus::Checking;
            state.mark_dirty();
            vec![Effect::CheckHealth]
        }
        Msg::HealthChecked(health) => {
            state.health = health;
            state.mark_dirty();
            Vec::new()
        }
        Msg::LaunchRequested => {
            state.mark_dirty();
            match state.session.begin_launch() {
                Ok(ticket) => {
                    state.last_error = None;
                    vec![Effect::LaunchLogin { ticket }]
                }
                Err(rejection) => {
                    state.last_error = Some(rejection.to_string());
                    Vec::new()
                }
            }
        }
        Msg::LaunchFinished { ticket, outcome } => {
            if state.session.apply_launch(ticket, outcome) == Applied::Yes {
                state.last_error = state.session.message().map(ToOwned::to_owned);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::VerifyRequested => {
            state.mark_dirty();
            match state.session.begin_verify() {
                Ok(ticket) => {
                    state.last_error = None;
                    vec![Effect::CheckAuth { ticket }]
                }
                Err(rejection) => {
                    state.last_error = Some(rejection.to_string());
                    Vec::new()
                }
            }
        }
        Msg::VerifyFinished { ticket, outcome } => {
            if state.session.apply_verify(ticket, outcome) == Applied::Yes {
                state.last_error = state.session.message().map(ToOwned::to_owned);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CancelRequested => {
            if state.session.cancel() {
                state.last_error = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SessionReset => {
            state.session.reset();
            state.mark_dirty();
            Vec::new()
        }
        Msg::ScrapeRequested {
            target,
            requested_at,
        } => request_scrape(&mut state, target, requested_at),
        Msg::PhaseReached { request_id, phase } => {
            if state.desk.advance(request_id, phase) {
                state.status_line = Some(phase.label().to_string());
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ScrapeFinished { request_id, result } => {
            match state.desk.resolve(request_id) {
                Resolution::Current(_) => {
                    apply_result(&mut state, result);
                    state.mark_dirty();
                }
                Resolution::Superseded(_) | Resolution::Unknown => {}
            }
            Vec::new()
        }
        Msg::ResultCleared => {
            if state.sink.clear().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn request_scrape(
    state: &mut AppState,
    target: ScrapeTarget,
    requested_at: std::time::Instant,
) -> Vec<Effect> {
    state.mark_dirty();
    let Some(url) = target.trimmed_url().map(ToOwned::to_owned) else {
        state.last_error = Some(URL_REQUIRED.to_string());
        state.scrape_failure = Some(FailureKind::InvalidTarget);
        return Vec::new();
    };
    if target.requires_session && !state.session.is_authenticated() {
        state.last_error = Some(format!(
            "sign in before scraping {} (session is {})",
            target.kind.label(),
            state.session.status().label()
        ));
        state.scrape_failure = Some(FailureKind::SessionRequired);
        return Vec::new();
    }

    let target = ScrapeTarget { url, ..target };
    let begun = state.desk.begin(target.clone(), requested_at);
    state.last_error = None;
    state.scrape_failure = None;
    state.status_line = Some(ProgressPhase::Initializing.label().to_string());

    let mut effects = Vec::with_capacity(begun.superseded.len() + 1);
    for request_id in begun.superseded {
        effects.push(Effect::CancelPhases { request_id });
    }
    effects.push(Effect::Scrape {
        request_id: begun.id,
        target,
    });
    effects
}

fn apply_result(state: &mut AppState, result: ScrapeResult) {
    state.scrape_failure = result.failure.clone();
    if result.success {
        state.last_error = None;
        state.status_line = Some(ProgressPhase::Completed.label().to_string());
        state.sink.set(result);
    } else {
        state.status_line = Some(format!("Error: {}", result.message));
        state.last_error = Some(result.message);
    }
    // A newer request still in flight keeps the status line.
    if let Some(active) = state.desk.active() {
        state.status_line = Some(active.phase.label().to_string());
    }
}
