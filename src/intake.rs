//! Heuristic intake classifier
//!
//! Turns free text into a suggested task title and priority using keyword
//! rules. Deterministic and stateless.

use crate::models::{IntakeSuggestion, Priority};

/// Titles longer than this are cut back to a word boundary
pub const MAX_TITLE_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

/// Substrings that mark a request as high priority
pub const HIGH_PRIORITY_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "critical",
    "important",
    "emergency",
    "deadline",
    "fix",
    "bug",
    "broken",
];

/// Substrings that mark a request as low priority
pub const LOW_PRIORITY_KEYWORDS: &[&str] = &["nice to have", "optional", "later", "someday", "maybe"];

/// Suggests a title and priority for `input`
pub fn classify(input: &str) -> IntakeSuggestion {
    let folded = input.to_lowercase();
    IntakeSuggestion {
        title: suggest_title(&folded),
        priority: classify_priority(&folded),
    }
}

/// Builds a title from already lowercased text
fn suggest_title(folded: &str) -> String {
    let first_sentence = folded.split('.').next().unwrap_or_default().trim();

    let title = if first_sentence.is_empty() {
        take_chars(folded, MAX_TITLE_CHARS).trim().to_string()
    } else if first_sentence.chars().count() > MAX_TITLE_CHARS {
        let cut = take_chars(first_sentence, MAX_TITLE_CHARS);
        let cut = match cut.rfind(' ') {
            Some(space) => &cut[..space],
            None => cut,
        };
        format!("{}{}", cut, ELLIPSIS)
    } else {
        first_sentence.to_string()
    };

    capitalize_first(&title)
}

/// Matching is by substring, not by word
fn classify_priority(folded: &str) -> Priority {
    if HIGH_PRIORITY_KEYWORDS.iter().any(|kw| folded.contains(kw)) {
        Priority::High
    } else if LOW_PRIORITY_KEYWORDS.iter().any(|kw| folded.contains(kw)) {
        Priority::Low
    } else {
        Priority::Med
    }
}

/// The prefix of `s` holding at most `n` characters
fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
