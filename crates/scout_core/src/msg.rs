use crate::Panel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User clicked a navigation tab.
    TabClicked(Panel),
    /// User edited the analyzer search box.
    SearchInputChanged(String),
    /// User submitted the analyzer search box.
    SearchSubmitted,
    /// User edited and left the contributor limit box.
    ContributorLimitEdited(String),
    /// User picked an `owner/repo` entry from the suggestion list.
    SuggestionSelected(String),
    /// User edited the recommender description.
    RecommendInputChanged(String),
    /// User submitted the recommender description.
    RecommendSubmitted,
    /// User picked one of the canned recommender queries.
    QuickQueryChosen(String),
    /// User asked to analyze a recommended `owner/repo`.
    AnalyzeRecommended(String),
    /// User opened a contributor card.
    ProfileRequested(String),
    /// Host window lost visibility.
    VisibilityLost,
    /// Host is shutting down.
    Unload,
}
