use crate::Panel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowTab {
        panel: Panel,
        hidden: Vec<Panel>,
        title: &'static str,
    },
    ReconcileOverlay(Panel),
    ScheduleSuggestions { query: String },
    /// Drop any pending suggestion fetch and hide the list.
    HideSuggestions,
    StartAnalysis { owner: String, repo: String, limit: u32 },
    /// Resolve a bare repository name to `owner/repo`, then analyze it.
    ResolveAndAnalyze { name: String, limit: u32 },
    StartRecommendation { query: String, limit: u32 },
    OpenProfile { username: String },
    ShowError { panel: Panel, message: String },
    ShowWarning { message: String },
    CancelAll,
}
