use std::fmt;

/// An independent UI surface with its own request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Panel {
    Analyzer,
    Recommender,
}

impl Panel {
    pub const COUNT: usize = 2;
    pub const ALL: [Panel; Panel::COUNT] = [Panel::Analyzer, Panel::Recommender];

    pub(crate) fn index(self) -> usize {
        match self {
            Panel::Analyzer => 0,
            Panel::Recommender => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Panel::Analyzer => "analyzer",
            Panel::Recommender => "recommender",
        }
    }

    /// Window/page title shown while this panel is active.
    pub fn page_title(self) -> &'static str {
        match self {
            Panel::Analyzer => "GitHub Project Analyzer - Discover Open Source Contributors",
            Panel::Recommender => "AI Project Recommender - Find the Right GitHub Projects",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Panel::ALL
            .into_iter()
            .find(|panel| panel.name().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
