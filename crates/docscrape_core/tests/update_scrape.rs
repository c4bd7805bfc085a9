use std::sync::Once;
use std::time::Instant;

use docscrape_core::{
    update, AppState, CallOutcome, Effect, FailureKind, Msg, ProgressPhase, RequestId,
    ScrapeResult, ScrapeTarget, SessionStatus, SourceKind, URL_REQUIRED,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(docscrape_logging::initialize_for_tests);
}

fn request(state: AppState, target: ScrapeTarget) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::ScrapeRequested {
            target,
            requested_at: Instant::now(),
        },
    )
}

fn scrape_id(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Scrape { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("scrape effect")
}

fn markdown(kind: SourceKind, url: &str, body: &str) -> ScrapeResult {
    ScrapeResult::succeeded(kind, url, body.to_string(), Vec::new(), None)
}

fn authenticated() -> AppState {
    let (state, effects) = update(AppState::new(), Msg::LaunchRequested);
    let Some(Effect::LaunchLogin { ticket }) = effects.first().cloned() else {
        panic!("expected launch effect");
    };
    let (state, _) = update(
        state,
        Msg::LaunchFinished {
            ticket,
            outcome: CallOutcome::accepted(),
        },
    );
    let (state, effects) = update(state, Msg::VerifyRequested);
    let Some(Effect::CheckAuth { ticket }) = effects.first().cloned() else {
        panic!("expected check-auth effect");
    };
    let (state, _) = update(
        state,
        Msg::VerifyFinished {
            ticket,
            outcome: CallOutcome::accepted(),
        },
    );
    assert_eq!(state.view().session, SessionStatus::Authenticated);
    state
}

#[test]
fn empty_url_is_rejected_for_every_source_kind() {
    init_logging();
    for kind in SourceKind::ALL {
        let target = ScrapeTarget::new(kind, "   ").with_session_gate(false);
        let (state, effects) = request(AppState::new(), target);

        assert!(effects.is_empty(), "{kind}");
        assert_eq!(state.view().last_error.as_deref(), Some(URL_REQUIRED));
        assert_eq!(state.view().scrape_failure, Some(FailureKind::InvalidTarget));
        assert_eq!(state.view().in_flight, 0);
    }
}

#[test]
fn public_scrape_fills_sink_and_leaves_session_alone() {
    init_logging();
    let url = "https://example.org/doc";
    let (state, effects) = request(AppState::new(), ScrapeTarget::new(SourceKind::OdooDocs, url));

    assert_eq!(
        effects,
        vec![Effect::Scrape {
            request_id: RequestId(1),
            target: ScrapeTarget::new(SourceKind::OdooDocs, url),
        }]
    );
    assert_eq!(
        state.view().status_line.as_deref(),
        Some(ProgressPhase::Initializing.label())
    );

    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            request_id: RequestId(1),
            result: markdown(SourceKind::OdooDocs, url, "X"),
        },
    );

    assert_eq!(state.result().map(|r| r.markdown.as_str()), Some("X"));
    assert_eq!(state.view().session, SessionStatus::Unauthenticated);
    assert_eq!(
        state.view().status_line.as_deref(),
        Some(ProgressPhase::Completed.label())
    );
}

#[test]
fn gated_target_requires_authenticated_session() {
    init_logging();
    let target = ScrapeTarget::new(SourceKind::IsamsSupport, "https://support.isams.com/hc/c/1");

    let (state, effects) = request(AppState::new(), target.clone());
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.scrape_failure, Some(FailureKind::SessionRequired));
    assert!(view.last_error.unwrap().starts_with("sign in before scraping"));
    assert_eq!(view.in_flight, 0);

    let (state, effects) = request(authenticated(), target);
    assert_eq!(effects.len(), 1);
    assert_eq!(state.view().in_flight, 1);
    assert_eq!(state.view().scrape_failure, None);
}

#[test]
fn gate_can_be_lifted_per_target() {
    init_logging();
    let target = ScrapeTarget::new(SourceKind::ToddleSupport, "https://support.toddleapp.com/en")
        .with_session_gate(false);

    let (_state, effects) = request(AppState::new(), target);

    assert_eq!(effects.len(), 1);
}

#[test]
fn url_is_trimmed_before_dispatch() {
    init_logging();
    let (_state, effects) = request(
        AppState::new(),
        ScrapeTarget::new(SourceKind::PromptingGuide, "  https://www.promptingguide.ai/  "),
    );

    let Some(Effect::Scrape { target, .. }) = effects.last() else {
        panic!("expected scrape effect");
    };
    assert_eq!(target.url, "https://www.promptingguide.ai/");
}

#[test]
fn later_request_supersedes_stale_result() {
    init_logging();
    let (state, effects) = request(AppState::new(), ScrapeTarget::new(SourceKind::OdooDocs, "a"));
    let a = scrape_id(&effects);
    let (state, effects) = request(state, ScrapeTarget::new(SourceKind::OdooDocs, "b"));
    let b = scrape_id(&effects);

    assert_eq!(effects.first(), Some(&Effect::CancelPhases { request_id: a }));

    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            request_id: b,
            result: markdown(SourceKind::OdooDocs, "b", "B"),
        },
    );
    let (mut state, _) = update(
        state,
        Msg::ScrapeFinished {
            request_id: a,
            result: markdown(SourceKind::OdooDocs, "a", "A"),
        },
    );

    let stored = state.result().expect("stored result");
    assert_eq!(stored.markdown, "B");
    assert_eq!(stored.url, "b");
    assert_eq!(state.view().in_flight, 0);
    state.consume_dirty();

    // A late duplicate for an already resolved request changes nothing.
    let (mut state, _) = update(
        state,
        Msg::ScrapeFinished {
            request_id: b,
            result: markdown(SourceKind::OdooDocs, "b", "again"),
        },
    );
    assert!(!state.consume_dirty());
    assert_eq!(state.result().map(|r| r.markdown.as_str()), Some("B"));
}

#[test]
fn earlier_request_resolving_first_is_shown_until_replaced() {
    init_logging();
    let (state, effects) = request(AppState::new(), ScrapeTarget::new(SourceKind::OdooDocs, "a"));
    let a = scrape_id(&effects);
    let (state, effects) = request(state, ScrapeTarget::new(SourceKind::OdooDocs, "b"));
    let b = scrape_id(&effects);
    let (state, _) = update(
        state,
        Msg::PhaseReached {
            request_id: b,
            phase: ProgressPhase::Extracting,
        },
    );

    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            request_id: a,
            result: markdown(SourceKind::OdooDocs, "a", "A"),
        },
    );
    assert_eq!(state.result().map(|r| r.markdown.as_str()), Some("A"));
    // B is still running, so its phase stays on the status line.
    assert_eq!(
        state.view().status_line.as_deref(),
        Some(ProgressPhase::Extracting.label())
    );

    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            request_id: b,
            result: markdown(SourceKind::OdooDocs, "b", "B"),
        },
    );
    assert_eq!(state.result().map(|r| r.markdown.as_str()), Some("B"));
}

#[test]
fn phases_of_superseded_request_are_ignored() {
    init_logging();
    let (state, effects) = request(AppState::new(), ScrapeTarget::new(SourceKind::OdooDocs, "a"));
    let a = scrape_id(&effects);
    let (mut state, _) = request(state, ScrapeTarget::new(SourceKind::OdooDocs, "b"));
    state.consume_dirty();

    let (mut state, _) = update(
        state,
        Msg::PhaseReached {
            request_id: a,
            phase: ProgressPhase::Extracting,
        },
    );

    assert!(!state.consume_dirty());
    assert_eq!(
        state.view().active_request.map(|r| r.phase),
        Some(ProgressPhase::Initializing)
    );
}

#[test]
fn failure_keeps_previous_result_and_reports_message() {
    init_logging();
    let (state, effects) = request(AppState::new(), ScrapeTarget::new(SourceKind::OdooDocs, "a"));
    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            request_id: scrape_id(&effects),
            result: markdown(SourceKind::OdooDocs, "a", "kept"),
        },
    );

    let (state, effects) = request(state, ScrapeTarget::new(SourceKind::OdooDocs, "b"));
    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            request_id: scrape_id(&effects),
            result: ScrapeResult::failed(
                SourceKind::OdooDocs,
                "b",
                FailureKind::Refused,
                "page not found",
            ),
        },
    );

    let view = state.view();
    assert_eq!(view.last_error.as_deref(), Some("page not found"));
    assert_eq!(view.scrape_failure, Some(FailureKind::Refused));
    assert_eq!(view.status_line.as_deref(), Some("Error: page not found"));
    assert_eq!(state.result().map(|r| r.markdown.as_str()), Some("kept"));
}

#[test]
fn clearing_result_empties_sink() {
    init_logging();
    let (state, effects) = request(AppState::new(), ScrapeTarget::new(SourceKind::OdooDocs, "a"));
    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            request_id: scrape_id(&effects),
            result: markdown(SourceKind::OdooDocs, "a", "A"),
        },
    );

    let (state, _) = update(state, Msg::ResultCleared);

    assert_eq!(state.result(), None);
    assert_eq!(state.view().result, None);
}

#[test]
fn health_probe_round_trip() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::HealthCheckRequested);
    assert_eq!(effects, vec![Effect::CheckHealth]);
    assert_eq!(state.view().health, docscrape_core::HealthStatus::Checking);

    let (state, _) = update(
        state,
        Msg::HealthChecked(docscrape_core::HealthStatus::Unreachable("refused".into())),
    );
    assert_eq!(
        state.view().health,
        docscrape_core::HealthStatus::Unreachable("refused".into())
    );
}
