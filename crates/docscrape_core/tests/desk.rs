use std::time::Instant;

use docscrape_core::{ProgressPhase, Resolution, ScrapeDesk, ScrapeTarget, SourceKind};

fn target(url: &str) -> ScrapeTarget {
    ScrapeTarget::new(SourceKind::IsamsDeveloper, url)
}

#[test]
fn ids_increase_and_list_older_requests_as_superseded() {
    let mut desk = ScrapeDesk::new();
    let now = Instant::now();

    let first = desk.begin(target("a"), now);
    let second = desk.begin(target("b"), now);

    assert!(first.superseded.is_empty());
    assert!(second.id > first.id);
    assert_eq!(second.superseded, vec![first.id]);
    assert_eq!(desk.active().map(|r| r.id), Some(second.id));
    assert_eq!(desk.in_flight_count(), 2);
}

#[test]
fn phases_only_move_forward() {
    let mut desk = ScrapeDesk::new();
    let id = desk.begin(target("a"), Instant::now()).id;

    assert!(desk.advance(id, ProgressPhase::Extracting));
    assert!(!desk.advance(id, ProgressPhase::Navigating));
    assert!(!desk.advance(id, ProgressPhase::Extracting));
    assert_eq!(desk.active().map(|r| r.phase), Some(ProgressPhase::Extracting));
}

#[test]
fn resolution_depends_on_issue_order_not_arrival_order() {
    let mut desk = ScrapeDesk::new();
    let now = Instant::now();
    let a = desk.begin(target("a"), now).id;
    let b = desk.begin(target("b"), now).id;

    assert!(matches!(desk.resolve(b), Resolution::Current(r) if r.target.url == "b"));
    assert!(matches!(desk.resolve(a), Resolution::Superseded(r) if r.target.url == "a"));
    assert_eq!(desk.resolve(a), Resolution::Unknown);
    assert!(desk.active().is_none());
}
