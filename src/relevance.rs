//! Keyword relevance scoring and context extraction.
//!
//! Both functions match the keyword case-insensitively as a plain substring.

use crate::models::RelevanceLevel;
use itertools::Itertools;

/// Score an article's relevance to `keyword`.
///
/// Points:
/// - +3 if the keyword appears in the title
/// - +1 for 1-2 occurrences in the body, +2 for 3-5, +3 for more than 5
///   (non-overlapping occurrences, one band only)
///
/// A total of 5 or more is [`RelevanceLevel::High`], 3 or more is
/// [`RelevanceLevel::Medium`], anything else [`RelevanceLevel::Low`].
pub fn score(title: &str, full_text: &str, keyword: &str) -> RelevanceLevel {
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
        return RelevanceLevel::Low;
    }

    let mut points = 0;
    if title.to_lowercase().contains(&keyword) {
        points += 3;
    }

    points += match full_text.to_lowercase().matches(&keyword).count() {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        _ => 3,
    };

    match points {
        p if p >= 5 => RelevanceLevel::High,
        p if p >= 3 => RelevanceLevel::Medium,
        _ => RelevanceLevel::Low,
    }
}

/// Collect the sentences of `full_text` that mention `keyword`.
///
/// Surviving sentences have newlines flattened to spaces, are trimmed, and
/// are joined with `" | "`. Returns an empty string when nothing matches.
pub fn extract_context(full_text: &str, keyword: &str) -> String {
    if full_text.is_empty() {
        return String::new();
    }
    let keyword = keyword.to_lowercase();

    split_sentences(full_text)
        .into_iter()
        .filter(|sentence| sentence.to_lowercase().contains(&keyword))
        .map(|sentence| sentence.replace('\n', " ").trim().to_string())
        .join(" | ")
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split after `.` or `?` followed by whitespace, consuming that whitespace.
///
/// No split happens after abbreviations shaped like `e.g.` (word, dot, word,
/// any) or `Dr.` (capital, lowercase, dot). Ellipses and quoted
/// abbreviations can still mis-split.
fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, &(offset, c)) in chars.iter().enumerate() {
        if !c.is_whitespace() || i == 0 {
            continue;
        }
        let before = |n: usize| i.checked_sub(n).map(|j| chars[j].1);

        if !matches!(before(1), Some('.') | Some('?')) {
            continue;
        }

        let dotted_abbreviation = matches!(
            (before(4), before(3), before(2)),
            (Some(a), Some('.'), Some(b)) if is_word(a) && is_word(b)
        );
        let title_abbreviation = matches!(
            (before(3), before(2), before(1)),
            (Some(a), Some(b), Some('.')) if a.is_ascii_uppercase() && b.is_ascii_lowercase()
        );
        if dotted_abbreviation || title_abbreviation {
            continue;
        }

        sentences.push(&text[start..offset]);
        start = offset + c.len_utf8();
    }
    sentences.push(&text[start..]);
    sentences
}
