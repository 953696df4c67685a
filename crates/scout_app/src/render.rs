//! Plain-text rendering of engine events and form state.
use std::io::{self, Write};

use chrono::{DateTime, NaiveDate, Utc};
use scout_core::{AppViewModel, CharCountLevel, LoadingVisual, Panel};
use scout_engine::{
    ApiStatus, ContributorsResponse, RecommendationsResponse, RenderPayload, Suggestion,
    UiEvent, UserProfile,
};

pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn show_event(&mut self, event: &UiEvent) -> io::Result<()> {
        match event {
            UiEvent::Render { panel, payload } => match payload {
                RenderPayload::Contributors(data) => self.contributors(*panel, data),
                RenderPayload::Recommendations(data) => self.recommendations(*panel, data),
                RenderPayload::Profile(profile) => self.profile(profile),
            },
            UiEvent::Error { panel, message } => self.show_error(*panel, message),
            UiEvent::Progress { panel, label } => writeln!(self.out, "[{panel}]   > {label}"),
            UiEvent::Loading(LoadingVisual::Shown { panel, label }) => {
                writeln!(self.out, "[{panel}] ... {label}")
            }
            UiEvent::Loading(LoadingVisual::Hidden) => Ok(()),
            UiEvent::FollowersUpdated {
                username,
                followers,
            } => writeln!(
                self.out,
                "[{}]   {username}: {} followers",
                Panel::Analyzer,
                format_count(*followers)
            ),
            UiEvent::Suggestions(found) => self.suggestions(found),
            UiEvent::SuggestionsHidden => Ok(()),
            UiEvent::ApiStatus { status, base_url } => match status {
                ApiStatus::Online => writeln!(self.out, "API online at {base_url}"),
                ApiStatus::Offline => writeln!(
                    self.out,
                    "API offline at {base_url}. Start the backend service and try again."
                ),
            },
        }
    }

    pub fn show_tab(&mut self, panel: Panel, hidden: &[Panel], title: &str) -> io::Result<()> {
        let hidden = hidden
            .iter()
            .map(|panel| panel.name())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(self.out, "== {title} ==")?;
        writeln!(self.out, "[{panel}] active (hidden: {hidden})")
    }

    pub fn show_error(&mut self, panel: Panel, message: &str) -> io::Result<()> {
        writeln!(self.out, "[{panel}] error: {message}")
    }

    pub fn show_warning(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "warning: {message}")
    }

    pub fn show_text(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn show_view(&mut self, view: &AppViewModel) -> io::Result<()> {
        writeln!(self.out, "[{}] {}", view.active_tab, view.page_title)?;
        writeln!(
            self.out,
            "  search: {:?} (top {} contributors)",
            view.search_input, view.contributor_limit
        )?;
        writeln!(
            self.out,
            "  request: {:?} {}/{}{}",
            view.recommend_input,
            view.recommend_chars,
            view.recommend_char_limit,
            char_level_marker(view.recommend_char_level)
        )
    }

    fn contributors(&mut self, panel: Panel, data: &ContributorsResponse) -> io::Result<()> {
        let repo = &data.repository;
        writeln!(self.out, "[{panel}] {}", repo.full_name)?;
        if let Some(description) = non_blank(&repo.description) {
            writeln!(self.out, "  {description}")?;
        }
        let mut facts = vec![
            format!("stars {}", format_count(repo.stars)),
            format!("forks {}", format_count(repo.forks)),
        ];
        if let Some(language) = non_blank(&repo.language) {
            facts.push(language.to_string());
        }
        if let Some(license) = non_blank(&repo.license) {
            facts.push(license.to_string());
        }
        if let Some(updated) = repo.updated_at.as_deref() {
            facts.push(format!("updated {}", format_age(updated, Utc::now())));
        }
        writeln!(self.out, "  {}", facts.join(" | "))?;
        if let Some(topics) = repo.topics.as_ref().filter(|topics| !topics.is_empty()) {
            writeln!(self.out, "  topics: {}", topics.join(", "))?;
        }

        if data.contributors.is_empty() {
            return writeln!(self.out, "  no contributors found");
        }
        writeln!(
            self.out,
            "  top {} of {} contributors:",
            data.contributors.len(),
            data.total_count.max(data.contributors.len())
        )?;
        for (rank, contributor) in data.contributors.iter().enumerate() {
            writeln!(
                self.out,
                "  {:>3}. {:<24} {:>7} commits  {}",
                rank + 1,
                contributor.username,
                format_count(contributor.contributions),
                contributor.profile_url
            )?;
        }
        Ok(())
    }

    fn recommendations(&mut self, panel: Panel, data: &RecommendationsResponse) -> io::Result<()> {
        writeln!(
            self.out,
            "[{panel}] {} recommendation(s) for {:?}",
            data.recommendations.len(),
            data.query
        )?;
        if let Some(analysis) = &data.analysis {
            if !analysis.summary.trim().is_empty() {
                writeln!(self.out, "  {}", analysis.summary.trim())?;
            }
            if !analysis.keywords.is_empty() {
                writeln!(self.out, "  keywords: {}", analysis.keywords.join(", "))?;
            }
        }
        if data.recommendations.is_empty() {
            return writeln!(self.out, "  nothing matched, try describing it differently");
        }
        for (rank, project) in data.recommendations.iter().enumerate() {
            writeln!(
                self.out,
                "  {}. {}  stars {} | forks {}{}",
                rank + 1,
                project.repository,
                format_count(project.stars),
                format_count(project.forks),
                non_blank(&project.language)
                    .map(|language| format!(" | {language}"))
                    .unwrap_or_default()
            )?;
            if let Some(description) = non_blank(&project.description) {
                writeln!(self.out, "     {description}")?;
            }
            if let Some(reason) = non_blank(&project.match_reason) {
                writeln!(self.out, "     why: {reason}")?;
            }
        }
        writeln!(self.out, "  (analyze <owner/repo> to inspect one)")
    }

    fn profile(&mut self, profile: &UserProfile) -> io::Result<()> {
        match non_blank(&profile.name) {
            Some(name) => writeln!(self.out, "@{} ({name})", profile.username)?,
            None => writeln!(self.out, "@{}", profile.username)?,
        }
        if let Some(bio) = non_blank(&profile.bio) {
            writeln!(self.out, "  {bio}")?;
        }
        let contact = [
            &profile.company,
            &profile.location,
            &profile.email,
            &profile.blog,
            &profile.website,
            &profile.twitter,
            &profile.linkedin,
        ]
        .into_iter()
        .filter_map(non_blank)
        .collect::<Vec<_>>();
        if !contact.is_empty() {
            writeln!(self.out, "  {}", contact.join(" | "))?;
        }
        let joined = profile
            .created_at
            .as_deref()
            .map(|created| format!(" | joined {}", format_date(created)))
            .unwrap_or_default();
        writeln!(
            self.out,
            "  followers {} | following {} | repos {}{joined}",
            format_count(profile.followers),
            format_count(profile.following),
            format_count(profile.public_repos)
        )
    }

    fn suggestions(&mut self, found: &[Suggestion]) -> io::Result<()> {
        writeln!(self.out, "  suggestions (pick <owner/repo>):")?;
        for suggestion in found {
            if suggestion.stars > 0 {
                writeln!(
                    self.out,
                    "    {}  stars {}",
                    suggestion.name,
                    format_count(suggestion.stars)
                )?;
            } else {
                writeln!(self.out, "    {}", suggestion.name)?;
            }
        }
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|text| !text.is_empty())
}

fn char_level_marker(level: CharCountLevel) -> &'static str {
    match level {
        CharCountLevel::Normal => "",
        CharCountLevel::Warning => " (almost full)",
        CharCountLevel::Danger => " (limit reached soon)",
    }
}

/// 1234 -> "1.2K", 2_500_000 -> "2.5M".
pub fn format_count(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// ISO timestamps become `YYYY-MM-DD`; anything else is shown as given.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => raw.to_string(),
    }
}

pub fn format_age(raw: &str, now: DateTime<Utc>) -> String {
    let Some(date) = parse_date(raw) else {
        return raw.to_string();
    };
    match (now.date_naive() - date).num_days() {
        days if days <= 0 => "today".to_string(),
        1 => "yesterday".to_string(),
        days if days < 30 => format!("{days} days ago"),
        days if days < 365 => format!("{} months ago", days / 30),
        days => format!("{} years ago", days / 365),
    }
}
