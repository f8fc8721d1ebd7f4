use std::collections::HashSet;

/// Words too common in form descriptions to narrow a search.
const STOPWORDS: [&str; 9] = [
    "form", "with", "need", "have", "that", "this", "what", "from", "where",
];

const MAX_KEYWORDS: usize = 10;

/// Pulls search keywords out of a free-text form description.
///
/// Lower-cases the input, splits on whitespace and sentence punctuation,
/// drops short tokens and stopwords, and keeps the first occurrence of
/// each remaining token, capped at ten.
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut keywords = Vec::new();

    let tokens = lowered
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '.' | '!' | '?'))
        .filter(|t| t.chars().count() > 3)
        .filter(|t| !STOPWORDS.contains(t));

    for token in tokens {
        if seen.insert(token) {
            keywords.push(token.to_string());
            if keywords.len() == MAX_KEYWORDS {
                break;
            }
        }
    }

    keywords
}
