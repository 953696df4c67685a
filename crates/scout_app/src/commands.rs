//! Line commands read from stdin.
use scout_core::{Msg, Panel};

pub const QUICK_QUERIES: [&str; 4] = [
    "A Python web framework for building REST APIs",
    "A JavaScript library for interactive data visualization",
    "A fast command-line argument parser for Rust",
    "A machine learning toolkit for image classification",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Messages to feed through `update`, in order.
    Send(Vec<Msg>),
    Status,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Command::Send(Vec::new()),
        "tab" => match Panel::parse(rest) {
            Some(panel) => send(Msg::TabClicked(panel)),
            None => Command::Invalid(format!("unknown tab {rest:?}, try analyzer or recommender")),
        },
        "type" => send(Msg::SearchInputChanged(rest.to_string())),
        "search" if rest.is_empty() => send(Msg::SearchSubmitted),
        "search" => Command::Send(vec![
            Msg::SearchInputChanged(rest.to_string()),
            Msg::SearchSubmitted,
        ]),
        "limit" => send(Msg::ContributorLimitEdited(rest.to_string())),
        "pick" => require(rest, "pick needs owner/repo", |name| {
            Msg::SuggestionSelected(name.to_string())
        }),
        "describe" => send(Msg::RecommendInputChanged(rest.to_string())),
        "recommend" if rest.is_empty() => send(Msg::RecommendSubmitted),
        "recommend" => Command::Send(vec![
            Msg::RecommendInputChanged(rest.to_string()),
            Msg::RecommendSubmitted,
        ]),
        "quick" => match rest.parse::<usize>() {
            Ok(index) if (1..=QUICK_QUERIES.len()).contains(&index) => {
                send(Msg::QuickQueryChosen(QUICK_QUERIES[index - 1].to_string()))
            }
            _ => Command::Invalid(format!("quick takes 1 to {}", QUICK_QUERIES.len())),
        },
        "analyze" => require(rest, "analyze needs owner/repo", |name| {
            Msg::AnalyzeRecommended(name.to_string())
        }),
        "profile" => require(rest, "profile needs a username", |name| {
            Msg::ProfileRequested(name.to_string())
        }),
        "hide" => send(Msg::VisibilityLost),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command {other:?}, type help")),
    }
}

fn send(msg: Msg) -> Command {
    Command::Send(vec![msg])
}

fn require(rest: &str, usage: &str, msg: impl FnOnce(&str) -> Msg) -> Command {
    if rest.is_empty() {
        Command::Invalid(usage.to_string())
    } else {
        send(msg(rest))
    }
}

pub fn help_text() -> String {
    let mut text = String::from(
        "Commands:\n\
         \x20 tab analyzer|recommender   switch panel\n\
         \x20 type <text>                edit the search box (shows suggestions)\n\
         \x20 search [owner/repo|name]   analyze a repository\n\
         \x20 pick <owner/repo>          choose a suggestion\n\
         \x20 limit <n>                  contributors to show (1-100)\n\
         \x20 describe <text>            edit the recommendation request\n\
         \x20 recommend [text]           ask for project recommendations\n\
         \x20 quick <n>                  use a canned request\n\
         \x20 analyze <owner/repo>       analyze a recommended project\n\
         \x20 profile <username>         show a contributor profile\n\
         \x20 hide                       pretend the window was hidden\n\
         \x20 status                     show the current form state\n\
         \x20 quit\n\
         Quick requests:\n",
    );
    for (index, query) in QUICK_QUERIES.iter().enumerate() {
        text.push_str(&format!("  {}. {}\n", index + 1, query));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn search_with_text_edits_then_submits() {
        assert_eq!(
            parse_command("search  facebook/react "),
            Command::Send(vec![
                Msg::SearchInputChanged("facebook/react".to_string()),
                Msg::SearchSubmitted,
            ])
        );
        assert_eq!(parse_command("search"), Command::Send(vec![Msg::SearchSubmitted]));
    }

    #[test]
    fn tabs_are_case_insensitive() {
        assert_eq!(
            parse_command("TAB Recommender"),
            Command::Send(vec![Msg::TabClicked(Panel::Recommender)])
        );
        assert!(matches!(parse_command("tab settings"), Command::Invalid(_)));
    }

    #[test]
    fn quick_queries_are_one_based() {
        assert_eq!(
            parse_command("quick 1"),
            Command::Send(vec![Msg::QuickQueryChosen(QUICK_QUERIES[0].to_string())])
        );
        assert!(matches!(parse_command("quick 0"), Command::Invalid(_)));
        assert!(matches!(parse_command("quick 9"), Command::Invalid(_)));
    }

    #[test]
    fn arguments_are_required_where_needed() {
        assert!(matches!(parse_command("profile"), Command::Invalid(_)));
        assert!(matches!(parse_command("pick "), Command::Invalid(_)));
        assert_eq!(
            parse_command("profile gaearon"),
            Command::Send(vec![Msg::ProfileRequested("gaearon".to_string())])
        );
    }

    #[test]
    fn blank_lines_do_nothing() {
        assert_eq!(parse_command("   "), Command::Send(Vec::new()));
        assert_eq!(parse_command("exit"), Command::Quit);
        assert!(matches!(parse_command("frobnicate"), Command::Invalid(_)));
    }
}
