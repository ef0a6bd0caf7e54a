//! Text normalization and keyword frequency counting

use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Common English function words that never count as keywords.
pub const STOP_WORDS: &[&str] = &[
    "and", "or", "the", "a", "an", "to", "for", "with", "of", "in", "on", "is", "are",
    "as", "at", "by", "from", "this", "that", "be", "will", "you", "we", "our",
];

/// Tokens of this length or shorter are dropped.
pub const MIN_TOKEN_LEN: usize = 2;

/// Lowercases, strips punctuation, tokenizes and filters raw document text.
///
/// Holds only immutable state, so one instance can be shared freely.
pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    non_alnum_regex: Regex,
}

/// Token → occurrence count for one document.
///
/// Built once per document through [`TextProcessor::count`] and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordFrequencies {
    counts: HashMap<String, usize>,
}

impl KeywordFrequencies {
    pub fn get(&self, keyword: &str) -> usize {
        self.counts.get(keyword).copied().unwrap_or(0)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.counts.contains_key(keyword)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let non_alnum_regex = Regex::new(r"[^a-z0-9 ]").expect("Invalid non-alphanumeric regex");

        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            non_alnum_regex,
        }
    }

    /// Lowercase and replace every character outside `[a-z0-9 ]` with a space.
    pub fn clean_text(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        self.non_alnum_regex.replace_all(&lowered, " ").into_owned()
    }

    /// Split cleaned text into keyword tokens, in document order.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.clean_text(text)
            .split_whitespace()
            .filter(|word| word.len() > MIN_TOKEN_LEN)
            .filter(|word| !self.stop_words.contains(*word))
            .map(str::to_string)
            .collect()
    }

    pub fn count<I, S>(&self, tokens: I) -> KeywordFrequencies
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts = HashMap::new();
        for token in tokens {
            *counts.entry(token.into()).or_insert(0) += 1;
        }
        KeywordFrequencies { counts }
    }

    pub fn normalize_and_count(&self, text: &str) -> KeywordFrequencies {
        self.count(self.normalize(text))
    }
}
