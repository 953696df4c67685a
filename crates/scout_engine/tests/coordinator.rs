use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use scout_core::{LoadingVisual, Panel, RequestError};
use scout_engine::{CallOptions, CallToken, Outcome, Renderer, RequestCoordinator, UiEvent};
use tokio::sync::oneshot;

#[derive(Default)]
struct RecordingRenderer {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingRenderer {
    fn take(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl Renderer for RecordingRenderer {
    fn emit(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn setup() -> (Arc<RecordingRenderer>, Arc<RequestCoordinator>) {
    scout_logging::initialize_for_tests();
    let renderer = Arc::new(RecordingRenderer::default());
    let coordinator = Arc::new(RequestCoordinator::new(renderer.clone()));
    (renderer, coordinator)
}

fn shown(panel: Panel, label: &str) -> UiEvent {
    UiEvent::Loading(LoadingVisual::Shown {
        panel,
        label: label.to_string(),
    })
}

fn hidden() -> UiEvent {
    UiEvent::Loading(LoadingVisual::Hidden)
}

fn replied(rx: oneshot::Receiver<u32>) -> impl std::future::Future<Output = Result<u32, RequestError>> {
    async move { rx.await.map_err(|_| RequestError::Cancelled) }
}

#[tokio::test]
async fn newer_call_supersedes_the_older_one_on_the_same_panel() {
    let (renderer, coordinator) = setup();
    let (_first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();

    let first = coordinator.start(Panel::Analyzer, CallOptions::new("first"), |_| replied(first_rx));
    let second = coordinator.start(Panel::Analyzer, CallOptions::new("second"), |_| {
        replied(second_rx)
    });

    assert_eq!(first.await, Outcome::Cancelled);
    assert!(coordinator.is_loading(Panel::Analyzer));

    second_tx.send(7).unwrap();
    assert_eq!(second.await, Outcome::Completed(7));
    assert!(!coordinator.is_any_loading());
    assert_eq!(
        renderer.take(),
        vec![
            shown(Panel::Analyzer, "first"),
            shown(Panel::Analyzer, "second"),
            hidden()
        ]
    );
}

#[tokio::test]
async fn overlay_stays_up_while_another_panel_is_loading() {
    let (renderer, coordinator) = setup();
    let (analyzer_tx, analyzer_rx) = oneshot::channel();
    let (recommender_tx, recommender_rx) = oneshot::channel();

    let analysis = coordinator.start(
        Panel::Analyzer,
        CallOptions::new("Fetching repository data"),
        |_| replied(analyzer_rx),
    );
    let recommendation = coordinator.start(
        Panel::Recommender,
        CallOptions::new("Analyzing your request"),
        |_| replied(recommender_rx),
    );

    recommender_tx.send(1).unwrap();
    assert_eq!(recommendation.await, Outcome::Completed(1));
    assert!(coordinator.is_any_loading());
    assert_eq!(
        coordinator.overlay(),
        LoadingVisual::Shown {
            panel: Panel::Analyzer,
            label: "Fetching repository data".to_string()
        }
    );

    analyzer_tx.send(2).unwrap();
    assert_eq!(analysis.await, Outcome::Completed(2));
    assert_eq!(coordinator.overlay(), LoadingVisual::Hidden);
    assert_eq!(
        renderer.take(),
        vec![
            shown(Panel::Analyzer, "Fetching repository data"),
            shown(Panel::Recommender, "Analyzing your request"),
            shown(Panel::Analyzer, "Fetching repository data"),
            hidden()
        ]
    );
}

#[tokio::test]
async fn failures_are_reported_once_with_the_service_detail() {
    let (renderer, coordinator) = setup();
    let call = coordinator.start(Panel::Analyzer, CallOptions::new("Fetching"), |_| async {
        Err::<(), _>(RequestError::Remote {
            status: 404,
            detail: Some("Repository not found".to_string()),
        })
    });

    assert!(matches!(call.await, Outcome::Failed(RequestError::Remote { status: 404, .. })));
    assert_eq!(
        renderer.take(),
        vec![
            shown(Panel::Analyzer, "Fetching"),
            hidden(),
            UiEvent::Error {
                panel: Panel::Analyzer,
                message: "Repository not found".to_string()
            }
        ]
    );
}

#[tokio::test]
async fn cancelled_calls_render_nothing() {
    let (renderer, coordinator) = setup();
    let (tx, rx) = oneshot::channel();
    let call = coordinator.start(Panel::Recommender, CallOptions::new("Analyzing"), |_| {
        replied(rx)
    });

    assert!(coordinator.cancel(Panel::Recommender));
    assert!(!coordinator.is_loading(Panel::Recommender));
    assert!(!coordinator.cancel(Panel::Recommender));

    let _ = tx.send(3);
    assert_eq!(call.await, Outcome::Cancelled);
    assert_eq!(
        renderer.take(),
        vec![shown(Panel::Recommender, "Analyzing"), hidden()]
    );
}

#[tokio::test]
async fn work_reporting_cancellation_is_not_an_error() {
    let (renderer, coordinator) = setup();
    let call = coordinator.start(Panel::Analyzer, CallOptions::new("Fetching"), |_| async {
        Err::<(), _>(RequestError::Cancelled)
    });

    assert_eq!(call.await, Outcome::Cancelled);
    assert!(!coordinator.is_any_loading());
    let events = renderer.take();
    assert!(events
        .iter()
        .all(|event| !matches!(event, UiEvent::Error { .. })));
}

#[tokio::test]
async fn cancel_all_clears_every_panel() {
    let (renderer, coordinator) = setup();
    let (_a_tx, a_rx) = oneshot::channel();
    let (_r_tx, r_rx) = oneshot::channel();
    let analysis = coordinator.start(Panel::Analyzer, CallOptions::new("a"), |_| replied(a_rx));
    let recommendation =
        coordinator.start(Panel::Recommender, CallOptions::new("r"), |_| replied(r_rx));

    coordinator.cancel_all();
    assert!(!coordinator.is_any_loading());
    assert_eq!(analysis.await, Outcome::Cancelled);
    assert_eq!(recommendation.await, Outcome::Cancelled);
    assert_eq!(renderer.take().last(), Some(&hidden()));
}

#[tokio::test(start_paused = true)]
async fn watchdog_turns_a_hung_call_into_a_timeout() {
    let (renderer, coordinator) = setup();
    let options = CallOptions::new("Analyzing").with_watchdog(Some(Duration::from_secs(5)));
    let call = coordinator.start(Panel::Recommender, options, |token: CallToken| async move {
        token.cancellation().cancelled().await;
        Err::<(), _>(RequestError::Cancelled)
    });

    assert_eq!(call.await, Outcome::Failed(RequestError::Timeout));
    assert!(!coordinator.is_loading(Panel::Recommender));
    let events = renderer.take();
    assert_eq!(events[1], hidden());
    assert!(matches!(
        &events[2],
        UiEvent::Error { panel: Panel::Recommender, message } if message.contains("too long")
    ));
}

#[tokio::test]
async fn progress_from_a_superseded_call_is_ignored() {
    let (renderer, coordinator) = setup();
    let stale: Arc<Mutex<Option<CallToken>>> = Arc::default();
    let slot = stale.clone();
    let (_first_tx, first_rx) = oneshot::channel();
    let (_second_tx, second_rx) = oneshot::channel();

    let _first = coordinator.start(Panel::Recommender, CallOptions::new("Analyzing"), move |token| {
        *slot.lock().unwrap() = Some(token);
        replied(first_rx)
    });
    let current: Arc<Mutex<Option<CallToken>>> = Arc::default();
    let current_slot = current.clone();
    let _second =
        coordinator.start(Panel::Recommender, CallOptions::new("Analyzing"), move |token| {
            *current_slot.lock().unwrap() = Some(token);
            replied(second_rx)
        });
    renderer.take();

    let stale = stale.lock().unwrap().take().unwrap();
    let current = current.lock().unwrap().take().unwrap();
    assert!(stale.is_cancelled());
    assert!(!coordinator.report_progress(&stale, "Generating recommendations"));
    assert!(coordinator.report_progress(&current, "Searching for matching projects"));

    assert_eq!(
        coordinator.snapshot(Panel::Recommender).progress_label(),
        Some("Searching for matching projects")
    );
    assert_eq!(
        renderer.take(),
        vec![UiEvent::Progress {
            panel: Panel::Recommender,
            label: "Searching for matching projects".to_string()
        }]
    );
}

#[tokio::test]
async fn reconcile_repaints_only_the_visible_panels_overlay() {
    let (renderer, coordinator) = setup();
    let (_tx, rx) = oneshot::channel();
    let _call = coordinator.start(Panel::Analyzer, CallOptions::new("Fetching"), |_| replied(rx));
    renderer.take();

    coordinator.reconcile_overlay(Panel::Recommender);
    assert!(renderer.take().is_empty());

    coordinator.reconcile_overlay(Panel::Analyzer);
    assert_eq!(renderer.take(), vec![shown(Panel::Analyzer, "Fetching")]);
}

#[tokio::test]
async fn reset_forgets_everything() {
    let (_renderer, coordinator) = setup();
    let (_tx, rx) = oneshot::channel();
    let call = coordinator.start(Panel::Analyzer, CallOptions::new("Fetching"), |_| replied(rx));

    coordinator.reset();
    assert!(!coordinator.is_any_loading());
    assert_eq!(coordinator.snapshot(Panel::Analyzer).progress_label(), None);
    assert_eq!(coordinator.overlay(), LoadingVisual::Hidden);
    assert_eq!(call.await, Outcome::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn earlier_panel_settling_leaves_the_other_panel_loading() {
    let (renderer, coordinator) = setup();
    let (analyzer_tx, analyzer_rx) = oneshot::channel();
    let (_recommender_tx, recommender_rx) = oneshot::channel();

    let analysis = coordinator.start(
        Panel::Analyzer,
        CallOptions::new("Fetching repository data"),
        |_| replied(analyzer_rx),
    );
    tokio::time::sleep(Duration::from_millis(100)).await;
    let _recommendation = coordinator.start(
        Panel::Recommender,
        CallOptions::new("Analyzing your request"),
        |_| replied(recommender_rx),
    );

    analyzer_tx.send(5).unwrap();
    assert_eq!(analysis.await, Outcome::Completed(5));

    assert!(coordinator.is_loading(Panel::Recommender));
    assert_eq!(
        coordinator.snapshot(Panel::Recommender).progress_label(),
        Some("Analyzing your request")
    );
    // The overlay belonged to the recommender and stays as it was.
    assert_eq!(
        renderer.take(),
        vec![
            shown(Panel::Analyzer, "Fetching repository data"),
            shown(Panel::Recommender, "Analyzing your request"),
        ]
    );
}
