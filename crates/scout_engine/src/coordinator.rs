//! Per-panel request lifecycle.
//!
//! The coordinator allows at most one in-flight call per [`Panel`]. Starting a
//! call cancels the panel's previous one; cancelling clears coordinator state
//! right away, so a late settlement of the old call is dropped without
//! rendering anything. The shared loading overlay is only ever written here,
//! after checking every panel.
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use scout_core::{CallId, LoadingVisual, Panel, PanelRequestState, RequestError, RequestTable};
use scout_logging::{scout_debug, scout_info, scout_warn};
use tokio_util::sync::CancellationToken;

use crate::{Renderer, UiEvent};

/// Handle given to the work of one call.
#[derive(Debug, Clone)]
pub struct CallToken {
    panel: Panel,
    call: CallId,
    cancel: CancellationToken,
}

impl CallToken {
    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn id(&self) -> CallId {
        self.call
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOptions {
    /// Progress label shown while the call starts.
    pub label: String,
    /// Cancels the call and reports [`RequestError::Timeout`] once elapsed.
    pub watchdog: Option<Duration>,
}

impl CallOptions {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            watchdog: None,
        }
    }

    pub fn with_watchdog(mut self, watchdog: Option<Duration>) -> Self {
        self.watchdog = watchdog;
        self
    }
}

/// How a started call ended, from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The payload, for the caller to render.
    Completed(T),
    /// Already forwarded to the renderer.
    Failed(RequestError),
    /// Superseded or cancelled. Nothing was rendered.
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Failed(_) | Outcome::Cancelled => None,
        }
    }
}

struct Inner {
    table: RequestTable,
    tokens: BTreeMap<Panel, CancellationToken>,
    overlay: LoadingVisual,
}

impl Inner {
    fn set_overlay(&mut self, next: LoadingVisual) -> Option<LoadingVisual> {
        if self.overlay == next {
            return None;
        }
        self.overlay = next.clone();
        Some(next)
    }

    /// Overlay after `panel` stopped loading.
    fn after_panel_idle(&mut self, panel: Panel) -> Option<LoadingVisual> {
        let Some(next_owner) = self.table.loading_panels().next() else {
            return self.set_overlay(LoadingVisual::Hidden);
        };
        match &self.overlay {
            LoadingVisual::Shown { panel: owner, .. } if *owner == panel => {
                let label = self
                    .table
                    .state(next_owner)
                    .progress_label()
                    .unwrap_or_default()
                    .to_string();
                self.set_overlay(LoadingVisual::Shown {
                    panel: next_owner,
                    label,
                })
            }
            _ => None,
        }
    }
}

pub struct RequestCoordinator {
    inner: Mutex<Inner>,
    renderer: Arc<dyn Renderer>,
}

impl RequestCoordinator {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                table: RequestTable::new(),
                tokens: BTreeMap::new(),
                overlay: LoadingVisual::Hidden,
            }),
            renderer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn show(&self, change: Option<LoadingVisual>) {
        if let Some(visual) = change {
            self.renderer.emit(UiEvent::Loading(visual));
        }
    }

    /// Starts a call for `panel`, superseding any call still active there.
    ///
    /// Bookkeeping happens before this returns, so a `cancel` issued right
    /// after already applies to the new call. The returned future drives the
    /// work and must be awaited (or spawned) to settle the call.
    pub fn start<T, F, Fut>(
        self: &Arc<Self>,
        panel: Panel,
        options: CallOptions,
        work: F,
    ) -> impl Future<Output = Outcome<T>>
    where
        F: FnOnce(CallToken) -> Fut,
        Fut: Future<Output = Result<T, RequestError>>,
    {
        let token = self.begin(panel, &options.label);
        let work = work(token.clone());
        let coordinator = Arc::clone(self);
        let watchdog = options.watchdog;

        async move {
            let cancelled = token.cancel.clone();
            let result = tokio::select! {
                biased;
                _ = cancelled.cancelled() => Err(RequestError::Cancelled),
                _ = expire(watchdog) => {
                    scout_warn!("{} call #{} hit its watchdog", panel, token.call);
                    token.cancel.cancel();
                    Err(RequestError::Timeout)
                }
                result = work => result,
            };
            coordinator.finish(&token, result)
        }
    }

    fn begin(&self, panel: Panel, label: &str) -> CallToken {
        let cancel = CancellationToken::new();
        let (started, change) = {
            let mut inner = self.lock();
            let started = inner.table.begin(panel, label);
            if let Some(previous) = inner.tokens.insert(panel, cancel.clone()) {
                previous.cancel();
            }
            let change = inner.set_overlay(LoadingVisual::Shown {
                panel,
                label: label.to_string(),
            });
            (started, change)
        };
        if let Some(old) = started.superseded {
            scout_debug!("{} call #{} superseded by #{}", panel, old, started.call);
        }
        scout_info!("{} call #{} started: {}", panel, started.call, label);
        self.show(change);
        CallToken {
            panel,
            call: started.call,
            cancel,
        }
    }

    fn finish<T>(&self, token: &CallToken, result: Result<T, RequestError>) -> Outcome<T> {
        let panel = token.panel;
        let change = {
            let mut inner = self.lock();
            if !inner.table.settle(panel, token.call) {
                scout_debug!("{} call #{} settled after cancellation", panel, token.call);
                return Outcome::Cancelled;
            }
            inner.tokens.remove(&panel);
            inner.after_panel_idle(panel)
        };
        self.show(change);

        match result {
            Ok(value) => {
                scout_info!("{} call #{} completed", panel, token.call);
                Outcome::Completed(value)
            }
            Err(RequestError::Cancelled) => {
                scout_debug!("{} call #{} reported cancellation", panel, token.call);
                Outcome::Cancelled
            }
            Err(err) => {
                scout_warn!("{} call #{} failed: {}", panel, token.call, err);
                if let Some(message) = err.user_message() {
                    self.renderer.emit(UiEvent::Error { panel, message });
                }
                Outcome::Failed(err)
            }
        }
    }

    /// Cancels the panel's active call. Returns false if the panel was idle.
    pub fn cancel(&self, panel: Panel) -> bool {
        let (call, change) = {
            let mut inner = self.lock();
            let Some(call) = inner.table.clear(panel) else {
                return false;
            };
            if let Some(token) = inner.tokens.remove(&panel) {
                token.cancel();
            }
            (call, inner.after_panel_idle(panel))
        };
        scout_debug!("{} call #{} cancelled", panel, call);
        self.show(change);
        true
    }

    pub fn cancel_all(&self) {
        for panel in Panel::ALL {
            self.cancel(panel);
        }
    }

    pub fn is_any_loading(&self) -> bool {
        self.lock().table.is_any_loading()
    }

    pub fn is_loading(&self, panel: Panel) -> bool {
        self.lock().table.state(panel).is_loading()
    }

    pub fn snapshot(&self, panel: Panel) -> PanelRequestState {
        self.lock().table.state(panel).clone()
    }

    /// Last overlay state written to the renderer.
    pub fn overlay(&self) -> LoadingVisual {
        self.lock().overlay.clone()
    }

    /// Re-applies the overlay after `panel` became the visible panel.
    pub fn reconcile_overlay(&self, panel: Panel) {
        let change = {
            let mut inner = self.lock();
            match inner.table.overlay_for(panel) {
                // Re-emit even if unchanged so a freshly shown tab paints it.
                Some(visual @ LoadingVisual::Shown { .. }) => {
                    inner.overlay = visual.clone();
                    Some(visual)
                }
                Some(LoadingVisual::Hidden) => inner.set_overlay(LoadingVisual::Hidden),
                None => None,
            }
        };
        self.show(change);
    }

    /// Records a new stage for the call behind `token`. Stale tokens are ignored.
    pub fn report_progress(&self, token: &CallToken, label: impl Into<String>) -> bool {
        let label = label.into();
        let on_overlay = {
            let mut inner = self.lock();
            if !inner.table.set_progress(token.panel, token.call, label.clone()) {
                return false;
            }
            match &mut inner.overlay {
                LoadingVisual::Shown { panel, label: shown } if *panel == token.panel => {
                    shown.clone_from(&label);
                    true
                }
                _ => false,
            }
        };
        if on_overlay {
            self.renderer.emit(UiEvent::Progress {
                panel: token.panel,
                label,
            });
        }
        true
    }

    /// Cancels everything and forgets progress labels.
    pub fn reset(&self) {
        self.cancel_all();
        let change = {
            let mut inner = self.lock();
            inner.table.reset();
            inner.set_overlay(LoadingVisual::Hidden)
        };
        self.show(change);
    }
}

async fn expire(watchdog: Option<Duration>) {
    match watchdog {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}
