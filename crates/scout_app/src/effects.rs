use std::io::Stdout;
use std::sync::{Arc, Mutex, PoisonError};

use scout_core::Effect;
use scout_engine::EngineHandle;
use scout_logging::{scout_debug, scout_warn};

use crate::render::TerminalView;

pub type SharedView = Arc<Mutex<TerminalView<Stdout>>>;

/// Runs a closure against the shared terminal view, logging write failures.
pub fn with_view(
    view: &SharedView,
    draw: impl FnOnce(&mut TerminalView<Stdout>) -> std::io::Result<()>,
) {
    let mut guard = view.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(err) = draw(&mut guard) {
        scout_warn!("Failed to write to terminal: {}", err);
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
    view: SharedView,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, view: SharedView) -> Self {
        Self { engine, view }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            scout_debug!("effect {:?}", effect);
            match effect {
                Effect::ShowTab {
                    panel,
                    hidden,
                    title,
                } => with_view(&self.view, |view| view.show_tab(panel, &hidden, title)),
                Effect::ReconcileOverlay(panel) => self.engine.reconcile_overlay(panel),
                Effect::ScheduleSuggestions { query } => self.engine.suggest(query),
                Effect::HideSuggestions => self.engine.hide_suggestions(),
                Effect::StartAnalysis { owner, repo, limit } => {
                    self.engine.analyze(owner, repo, limit);
                }
                Effect::ResolveAndAnalyze { name, limit } => {
                    self.engine.resolve_and_analyze(name, limit);
                }
                Effect::StartRecommendation { query, limit } => self.engine.recommend(query, limit),
                Effect::OpenProfile { username } => self.engine.open_profile(username),
                Effect::ShowError { panel, message } => {
                    with_view(&self.view, |view| view.show_error(panel, &message));
                }
                Effect::ShowWarning { message } => {
                    with_view(&self.view, |view| view.show_warning(&message));
                }
                Effect::CancelAll => self.engine.cancel_all(),
            }
        }
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}
