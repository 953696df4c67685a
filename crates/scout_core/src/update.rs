use crate::query::{
    normalize_contributor_limit, parse_repo_query, prepare_recommendation, MAX_CONTRIBUTOR_LIMIT,
    RECOMMENDATION_LIMIT,
};
use crate::{AppState, Effect, Msg, Panel, RepoQuery};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TabClicked(panel) => show_tab(&mut state, panel),
        Msg::SearchInputChanged(text) => {
            let query = text.trim().to_string();
            state.set_search_input(text);
            if query.chars().count() >= state.suggest_min_chars() {
                vec![Effect::ScheduleSuggestions { query }]
            } else {
                vec![Effect::HideSuggestions]
            }
        }
        Msg::SearchSubmitted => submit_search(&state),
        Msg::ContributorLimitEdited(raw) => {
            let limit = normalize_contributor_limit(&raw);
            state.set_contributor_limit(limit.value);
            if limit.clamped {
                vec![Effect::ShowWarning {
                    message: format!("At most {MAX_CONTRIBUTOR_LIMIT} contributors can be shown."),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::SuggestionSelected(full_name) => {
            state.set_search_input(full_name);
            submit_search(&state)
        }
        Msg::RecommendInputChanged(text) | Msg::QuickQueryChosen(text) => {
            state.set_recommend_input(&text);
            Vec::new()
        }
        Msg::RecommendSubmitted => match prepare_recommendation(state.recommend_input()) {
            Ok(query) => vec![Effect::StartRecommendation {
                query,
                limit: RECOMMENDATION_LIMIT,
            }],
            Err(err) => vec![Effect::ShowError {
                panel: Panel::Recommender,
                message: err.to_string(),
            }],
        },
        Msg::AnalyzeRecommended(full_name) => {
            let mut effects = show_tab(&mut state, Panel::Analyzer);
            state.set_search_input(full_name);
            effects.extend(submit_search(&state));
            effects
        }
        Msg::ProfileRequested(username) => {
            let username = username.trim();
            if username.is_empty() {
                Vec::new()
            } else {
                vec![Effect::OpenProfile {
                    username: username.to_string(),
                }]
            }
        }
        Msg::VisibilityLost => vec![Effect::CancelAll],
        Msg::Unload => vec![Effect::CancelAll, Effect::HideSuggestions],
    };

    (state, effects)
}

fn show_tab(state: &mut AppState, panel: Panel) -> Vec<Effect> {
    let switch = state.switch_tab(panel);
    vec![
        Effect::ShowTab {
            panel: switch.to,
            hidden: switch.hidden,
            title: switch.to.page_title(),
        },
        Effect::ReconcileOverlay(switch.to),
    ]
}

fn submit_search(state: &AppState) -> Vec<Effect> {
    let limit = state.contributor_limit();
    match parse_repo_query(state.search_input()) {
        Ok(RepoQuery::Qualified { owner, repo }) => vec![
            Effect::HideSuggestions,
            Effect::StartAnalysis { owner, repo, limit },
        ],
        Ok(RepoQuery::BareName(name)) => vec![
            Effect::HideSuggestions,
            Effect::ResolveAndAnalyze { name, limit },
        ],
        Err(err) => vec![Effect::ShowError {
            panel: Panel::Analyzer,
            message: err.to_string(),
        }],
    }
}
