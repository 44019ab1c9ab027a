//! Ranking extraction from free-text peer evaluations.
//!
//! Peers are asked to end their critique with:
//!
//! ```text
//! FINAL RANKING:
//! 1. Response B
//! 2. Response A
//! ```
//!
//! Models do not always comply, so extraction is layered. Each layer is a
//! separate function that can be tested on its own:
//!
//! | Step | Function | Applies to |
//! |------|----------|------------|
//! | 1 | [`ranking_sections`] | text between each `FINAL RANKING:` marker and the next |
//! | 2 | [`numbered_labels`] | `1. Response B` items in the last section that has any |
//! | 3 | [`mentioned_labels`] | any `Response X` in the first section, if no section is numbered |
//! | 4 | [`mentioned_labels`] | the whole text, if there is no marker |
//!
//! Peers sometimes repeat the marker in a closing sentence ("that is my
//! FINAL RANKING: no ties"), so the section holding the list is not
//! necessarily the last one.

use super::label::Label;
use regex::Regex;
use std::sync::LazyLock;

/// Marker that introduces the final ordered ranking
pub const FINAL_RANKING_MARKER: &str = "FINAL RANKING:";

/// `1. Response B`, `2) **Response A**`
static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+[.)]\s*\**\s*Response ([A-Z])").expect("valid numbered-item regex")
});

/// Bare `Response X` mention
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Response ([A-Z])").expect("valid mention regex"));

/// Extract a best-effort ordered ranking from a peer's reply.
///
/// Never fails; returns an empty list when nothing label-shaped is found.
/// Duplicates are preserved as they appear in the text.
///
/// ```
/// use council_domain::council::parse_ranking;
///
/// let text = "A is vague.\n\nFINAL RANKING:\n1. Response B\n2. Response A";
/// let order: Vec<char> = parse_ranking(text).iter().map(|l| l.letter()).collect();
/// assert_eq!(order, vec!['B', 'A']);
/// ```
pub fn parse_ranking(text: &str) -> Vec<Label> {
    let sections = ranking_sections(text);
    let Some(first) = sections.first() else {
        return mentioned_labels(text);
    };

    sections
        .iter()
        .rev()
        .map(|section| numbered_labels(section))
        .find(|labels| !labels.is_empty())
        .unwrap_or_else(|| mentioned_labels(first))
}

/// Text between each ranking marker and the next one (or the end).
///
/// Empty when the marker is absent. Anything before the first marker is
/// critique and may mention labels in arbitrary order.
pub fn ranking_sections(text: &str) -> Vec<&str> {
    text.split(FINAL_RANKING_MARKER).skip(1).collect()
}

/// Labels referenced by numbered list items, in list order
pub fn numbered_labels(section: &str) -> Vec<Label> {
    captured_labels(&NUMBERED_ITEM, section)
}

/// Every label mention, in appearance order
pub fn mentioned_labels(text: &str) -> Vec<Label> {
    captured_labels(&MENTION, text)
}

fn captured_labels(pattern: &Regex, text: &str) -> Vec<Label> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().chars().next())
        .filter_map(Label::from_letter)
        .collect()
}
