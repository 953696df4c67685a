use crate::query::{
    truncate_recommendation, DEFAULT_CONTRIBUTOR_LIMIT, DEFAULT_SUGGEST_MIN_CHARS,
    MAX_RECOMMEND_CHARS,
};
use crate::view_model::{AppViewModel, CharCountLevel};
use crate::{Panel, TabController, TabSwitch};

/// Front-end form and navigation state. Request lifecycles are tracked by the
/// engine, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    tabs: TabController,
    search_input: String,
    contributor_limit: u32,
    recommend_input: String,
    suggest_min_chars: usize,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            tabs: TabController::default(),
            search_input: String::new(),
            contributor_limit: DEFAULT_CONTRIBUTOR_LIMIT,
            recommend_input: String::new(),
            suggest_min_chars: DEFAULT_SUGGEST_MIN_CHARS,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum trimmed input length before suggestions are fetched.
    pub fn with_suggest_min_chars(mut self, min_chars: usize) -> Self {
        self.suggest_min_chars = min_chars;
        self
    }

    pub fn view(&self) -> AppViewModel {
        let recommend_chars = self.recommend_input.chars().count();
        AppViewModel {
            active_tab: self.tabs.active(),
            page_title: self.tabs.active().page_title(),
            search_input: self.search_input.clone(),
            contributor_limit: self.contributor_limit,
            recommend_input: self.recommend_input.clone(),
            recommend_chars,
            recommend_char_limit: MAX_RECOMMEND_CHARS,
            recommend_char_level: char_level(recommend_chars),
            dirty: self.dirty,
        }
    }

    pub fn active_tab(&self) -> Panel {
        self.tabs.active()
    }

    /// Returns whether the view changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn switch_tab(&mut self, panel: Panel) -> TabSwitch {
        self.mark_dirty();
        self.tabs.switch_to(panel)
    }

    pub(crate) fn search_input(&self) -> &str {
        &self.search_input
    }

    pub(crate) fn set_search_input(&mut self, text: String) {
        if self.search_input != text {
            self.search_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn contributor_limit(&self) -> u32 {
        self.contributor_limit
    }

    pub(crate) fn set_contributor_limit(&mut self, limit: u32) {
        if self.contributor_limit != limit {
            self.contributor_limit = limit;
            self.mark_dirty();
        }
    }

    pub(crate) fn recommend_input(&self) -> &str {
        &self.recommend_input
    }

    pub(crate) fn set_recommend_input(&mut self, text: &str) {
        let text = truncate_recommendation(text);
        if self.recommend_input != text {
            self.recommend_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn suggest_min_chars(&self) -> usize {
        self.suggest_min_chars
    }
}

fn char_level(chars: usize) -> CharCountLevel {
    if chars * 10 > MAX_RECOMMEND_CHARS * 9 {
        CharCountLevel::Danger
    } else if chars * 10 > MAX_RECOMMEND_CHARS * 8 {
        CharCountLevel::Warning
    } else {
        CharCountLevel::Normal
    }
}
