use crate::Panel;

/// Colour band of the recommender character counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharCountLevel {
    #[default]
    Normal,
    /// Above 80% of the limit.
    Warning,
    /// Above 90% of the limit.
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub active_tab: Panel,
    pub page_title: &'static str,
    pub search_input: String,
    pub contributor_limit: u32,
    pub recommend_input: String,
    pub recommend_chars: usize,
    pub recommend_char_limit: usize,
    pub recommend_char_level: CharCountLevel,
    pub dirty: bool,
}
