//! Input rules for the analyzer and recommender forms.
use thiserror::Error;

use crate::RequestError;

pub const DEFAULT_CONTRIBUTOR_LIMIT: u32 = 10;
pub const MAX_CONTRIBUTOR_LIMIT: u32 = 100;
pub const MAX_RECOMMEND_CHARS: usize = 500;
pub const RECOMMENDATION_LIMIT: u32 = 5;
pub const DEFAULT_SUGGEST_MIN_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Please enter the GitHub project to analyze.")]
    EmptyRepoQuery,
    #[error("Please enter a project name or owner/project.")]
    MalformedRepoQuery,
    #[error("No matching repository was found, please enter a more precise name.")]
    NoMatchingRepository,
    #[error("The suggestion service is unavailable, please try again later or enter owner/repo.")]
    SuggestionServiceUnavailable,
    #[error("Network error: could not fetch repository suggestions.")]
    SuggestionLookupFailed,
    #[error("Please describe what you are looking for.")]
    EmptyRecommendation,
}

/// What the user typed into the analyzer search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoQuery {
    Qualified { owner: String, repo: String },
    /// A bare repository name that has to be resolved to `owner/repo` first.
    BareName(String),
}

pub fn parse_repo_query(raw: &str) -> Result<RepoQuery, QueryError> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(QueryError::EmptyRepoQuery);
    }
    if !query.contains('/') {
        return Ok(RepoQuery::BareName(query.to_string()));
    }
    split_full_name(query)
        .map(|(owner, repo)| RepoQuery::Qualified { owner, repo })
        .ok_or(QueryError::MalformedRepoQuery)
}

/// Splits `owner/repo`. Segments past the second are ignored.
pub fn split_full_name(full_name: &str) -> Option<(String, String)> {
    let mut parts = full_name.trim().split('/');
    let owner = parts.next()?.trim();
    let repo = parts.next()?.trim();
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Message for a failed bare-name lookup; `None` when it was cancelled.
pub fn resolve_failure(err: &RequestError) -> Option<QueryError> {
    match err {
        RequestError::Cancelled => None,
        RequestError::Remote { .. } => Some(QueryError::SuggestionServiceUnavailable),
        RequestError::Timeout | RequestError::Transport(_) => {
            Some(QueryError::SuggestionLookupFailed)
        }
    }
}

/// Normalized contributor limit; `clamped` is set when the input exceeded
/// [`MAX_CONTRIBUTOR_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributorLimit {
    pub value: u32,
    pub clamped: bool,
}

pub fn normalize_contributor_limit(raw: &str) -> ContributorLimit {
    match leading_integer(raw) {
        Some(value) if value > i64::from(MAX_CONTRIBUTOR_LIMIT) => ContributorLimit {
            value: MAX_CONTRIBUTOR_LIMIT,
            clamped: true,
        },
        Some(value) if value >= 1 => ContributorLimit {
            value: value as u32,
            clamped: false,
        },
        _ => ContributorLimit {
            value: DEFAULT_CONTRIBUTOR_LIMIT,
            clamped: false,
        },
    }
}

/// Integer prefix of `raw`, so `"50abc"` is 50 and `"3.7"` is 3.
/// Saturates when the digits overflow.
fn leading_integer(raw: &str) -> Option<i64> {
    let text = raw.trim_start();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Caps the recommender input at [`MAX_RECOMMEND_CHARS`] characters.
pub fn truncate_recommendation(raw: &str) -> String {
    raw.chars().take(MAX_RECOMMEND_CHARS).collect()
}

pub fn prepare_recommendation(raw: &str) -> Result<String, QueryError> {
    let query = truncate_recommendation(raw.trim());
    if query.is_empty() {
        Err(QueryError::EmptyRecommendation)
    } else {
        Ok(query)
    }
}
