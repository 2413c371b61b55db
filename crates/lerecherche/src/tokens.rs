// Tokenization
//
// *Les Jetons* (The Tokens) - Split page text into weighted-profile terms

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Tokens this short or shorter carry no topical signal.
pub const MIN_TOKEN_LEN: usize = 3;

static NON_TOKEN_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("static token pattern is valid"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "and", "or", "to", "for", "of", "in", "on", "with", "by", "is", "are",
        "this", "that", "your", "you", // articles, pronouns
        "guide", "tools", "tool", "support", "help", "hub", "page", // generic site words
        "how", "do", "use", "what", "why", "when",
    ]
    .into_iter()
    .collect()
});

/// True if `token` is ignored by the vectorizer.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Tokenize free text into profile terms.
///
/// Lowercases, replaces every non-alphanumeric character with a space,
/// splits on whitespace and drops short tokens and stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_TOKEN_CHARS
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.len() >= MIN_TOKEN_LEN && !is_stop_word(token))
        .map(str::to_string)
        .collect()
}
