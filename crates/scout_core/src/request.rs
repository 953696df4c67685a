use crate::Panel;

/// Identifies one started call. Ids are never reused within a table.
pub type CallId = u64;

/// Per-panel request bookkeeping.
///
/// `is_loading` is derived from `active_call`, so a panel is loading exactly
/// while it owns an unsettled call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelRequestState {
    active_call: Option<CallId>,
    progress_label: Option<String>,
}

impl PanelRequestState {
    pub fn active_call(&self) -> Option<CallId> {
        self.active_call
    }

    pub fn is_loading(&self) -> bool {
        self.active_call.is_some()
    }

    /// Last stage reported for this panel. Kept after settlement.
    pub fn progress_label(&self) -> Option<&str> {
        self.progress_label.as_deref()
    }
}

/// Requested state of the shared loading overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingVisual {
    Shown { panel: Panel, label: String },
    Hidden,
}

/// Result of [`RequestTable::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Started {
    pub call: CallId,
    /// Call that was still active for the same panel and is now superseded.
    pub superseded: Option<CallId>,
}

/// One [`PanelRequestState`] per panel, keyed by the closed [`Panel`] set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestTable {
    panels: [PanelRequestState; Panel::COUNT],
    last_call: CallId,
}

impl RequestTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, panel: Panel) -> &PanelRequestState {
        &self.panels[panel.index()]
    }

    fn state_mut(&mut self, panel: Panel) -> &mut PanelRequestState {
        &mut self.panels[panel.index()]
    }

    /// Registers a new call for `panel`, replacing any call still active there.
    pub fn begin(&mut self, panel: Panel, label: impl Into<String>) -> Started {
        self.last_call += 1;
        let call = self.last_call;
        let entry = self.state_mut(panel);
        let superseded = entry.active_call.replace(call);
        entry.progress_label = Some(label.into());
        Started { call, superseded }
    }

    pub fn is_current(&self, panel: Panel, call: CallId) -> bool {
        self.state(panel).active_call == Some(call)
    }

    /// Updates the progress label if `call` is still the panel's active call.
    pub fn set_progress(&mut self, panel: Panel, call: CallId, label: impl Into<String>) -> bool {
        if !self.is_current(panel, call) {
            return false;
        }
        self.state_mut(panel).progress_label = Some(label.into());
        true
    }

    /// Clears the panel if `call` is still its active call.
    ///
    /// Returns false for stale settlements (superseded or cancelled calls).
    pub fn settle(&mut self, panel: Panel, call: CallId) -> bool {
        if !self.is_current(panel, call) {
            return false;
        }
        self.state_mut(panel).active_call = None;
        true
    }

    /// Drops the panel's active call, returning it if there was one.
    pub fn clear(&mut self, panel: Panel) -> Option<CallId> {
        self.state_mut(panel).active_call.take()
    }

    /// Clears every panel. Call ids keep increasing, so calls started before
    /// the reset stay stale.
    pub fn reset(&mut self) {
        self.panels = Default::default();
    }

    pub fn is_any_loading(&self) -> bool {
        self.panels.iter().any(PanelRequestState::is_loading)
    }

    pub fn loading_panels(&self) -> impl Iterator<Item = Panel> + '_ {
        Panel::ALL
            .into_iter()
            .filter(|panel| self.state(*panel).is_loading())
    }

    /// Overlay state to apply after `panel` became the visible panel.
    ///
    /// `None` means the overlay must be left as it is: `panel` is idle but
    /// another panel is still loading.
    pub fn overlay_for(&self, panel: Panel) -> Option<LoadingVisual> {
        let entry = self.state(panel);
        if entry.is_loading() {
            return Some(LoadingVisual::Shown {
                panel,
                label: entry.progress_label.clone().unwrap_or_default(),
            });
        }
        if self.is_any_loading() {
            None
        } else {
            Some(LoadingVisual::Hidden)
        }
    }
}
