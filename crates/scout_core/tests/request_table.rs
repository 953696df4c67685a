use scout_core::{LoadingVisual, Panel, RequestTable};

#[test]
fn begin_supersedes_only_the_same_panel() {
    let mut table = RequestTable::new();
    let first = table.begin(Panel::Analyzer, "searching");
    let other = table.begin(Panel::Recommender, "analyzing");
    let second = table.begin(Panel::Analyzer, "searching");

    assert_eq!(first.superseded, None);
    assert_eq!(other.superseded, None);
    assert_eq!(second.superseded, Some(first.call));
    assert_eq!(table.state(Panel::Analyzer).active_call(), Some(second.call));
    assert_eq!(table.state(Panel::Recommender).active_call(), Some(other.call));
}

#[test]
fn stale_settlement_is_ignored() {
    let mut table = RequestTable::new();
    let first = table.begin(Panel::Analyzer, "searching");
    let second = table.begin(Panel::Analyzer, "searching");

    assert!(!table.settle(Panel::Analyzer, first.call));
    assert!(table.state(Panel::Analyzer).is_loading());
    assert!(table.settle(Panel::Analyzer, second.call));
    assert!(!table.state(Panel::Analyzer).is_loading());
    assert!(!table.settle(Panel::Analyzer, second.call));
}

#[test]
fn any_loading_tracks_every_panel() {
    let mut table = RequestTable::new();
    assert!(!table.is_any_loading());

    let a = table.begin(Panel::Analyzer, "searching");
    assert!(table.is_any_loading());
    assert_eq!(table.loading_panels().collect::<Vec<_>>(), vec![Panel::Analyzer]);

    let r = table.begin(Panel::Recommender, "generating");
    assert_eq!(
        table.loading_panels().collect::<Vec<_>>(),
        vec![Panel::Analyzer, Panel::Recommender]
    );

    table.settle(Panel::Analyzer, a.call);
    assert!(table.is_any_loading());
    table.settle(Panel::Recommender, r.call);
    assert!(!table.is_any_loading());
}

#[test]
fn progress_only_updates_the_active_call() {
    let mut table = RequestTable::new();
    let first = table.begin(Panel::Recommender, "analyzing");
    assert!(table.set_progress(Panel::Recommender, first.call, "searching"));
    assert_eq!(table.state(Panel::Recommender).progress_label(), Some("searching"));

    let second = table.begin(Panel::Recommender, "analyzing");
    assert!(!table.set_progress(Panel::Recommender, first.call, "generating"));
    assert_eq!(table.state(Panel::Recommender).progress_label(), Some("analyzing"));
    assert!(table.set_progress(Panel::Recommender, second.call, "generating"));
}

#[test]
fn overlay_follows_the_visible_panel() {
    let mut table = RequestTable::new();
    assert_eq!(table.overlay_for(Panel::Analyzer), Some(LoadingVisual::Hidden));

    let call = table.begin(Panel::Recommender, "generating");
    assert_eq!(
        table.overlay_for(Panel::Recommender),
        Some(LoadingVisual::Shown {
            panel: Panel::Recommender,
            label: "generating".to_string()
        })
    );
    // Idle panel while another one loads: leave the overlay alone.
    assert_eq!(table.overlay_for(Panel::Analyzer), None);

    table.clear(Panel::Recommender);
    assert!(!table.settle(Panel::Recommender, call.call));
    assert_eq!(table.overlay_for(Panel::Analyzer), Some(LoadingVisual::Hidden));
}
