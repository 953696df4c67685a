use std::sync::mpsc;

use scout_core::{LoadingVisual, Panel};

use crate::{ApiStatus, RenderPayload, Suggestion};

/// Everything the engine asks the presentation layer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Render { panel: Panel, payload: RenderPayload },
    Error { panel: Panel, message: String },
    Progress { panel: Panel, label: String },
    Loading(LoadingVisual),
    /// Late follower count for a contributor card already on screen.
    FollowersUpdated { username: String, followers: u64 },
    Suggestions(Vec<Suggestion>),
    SuggestionsHidden,
    ApiStatus { status: ApiStatus, base_url: String },
}

/// Presentation collaborator. Implementations must not block.
pub trait Renderer: Send + Sync {
    fn emit(&self, event: UiEvent);
}

/// Forwards events to the thread that owns the UI.
pub struct ChannelRenderer {
    tx: mpsc::Sender<UiEvent>,
}

impl ChannelRenderer {
    pub fn new(tx: mpsc::Sender<UiEvent>) -> Self {
        Self { tx }
    }
}

impl Renderer for ChannelRenderer {
    fn emit(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }
}
