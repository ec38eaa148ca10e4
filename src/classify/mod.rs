// src/classify/mod.rs

pub mod keywords;

use serde::{Deserialize, Serialize};

pub use keywords::{OTHER_INDUSTRY, OTHER_ROLE};

/// Messages shorter than this with a single indicator count as noise.
pub const SHORT_MESSAGE_CHARS: usize = 100;

/// A named bucket and the substrings that put text into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw.as_str()))
    }
}

/// Every keyword table the classifiers use. Defaults to the built-in lists;
/// any table can be replaced from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    pub role_clusters: Vec<KeywordGroup>,
    pub industries: Vec<KeywordGroup>,
    pub spam_indicators: Vec<String>,
    pub senior_titles: Vec<String>,
    pub actionable_words: Vec<String>,
}

fn groups(table: &[(&str, &[&str])]) -> Vec<KeywordGroup> {
    table
        .iter()
        .map(|(name, kws)| KeywordGroup {
            name: name.to_string(),
            keywords: strings(kws),
        })
        .collect()
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            role_clusters: groups(keywords::ROLE_CLUSTERS),
            industries: groups(keywords::INDUSTRIES),
            spam_indicators: strings(keywords::SPAM_INDICATORS),
            senior_titles: strings(keywords::SENIOR_TITLES),
            actionable_words: strings(keywords::ACTIONABLE_WORDS),
        }
    }
}

/// Name of the first group with a keyword inside `text`.
fn first_match<'a>(table: &'a [KeywordGroup], text: &str) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    table
        .iter()
        .find(|g| g.matches(&lowered))
        .map(|g| g.name.as_str())
}

fn lowercase_all(list: &mut [String]) {
    for kw in list {
        *kw = kw.to_lowercase();
    }
}

impl Keywords {
    /// Lowercase every keyword. Matching lowercases the text, so tables
    /// loaded from config must be lowercase too.
    pub fn lowercased(mut self) -> Self {
        for group in self.role_clusters.iter_mut().chain(self.industries.iter_mut()) {
            lowercase_all(&mut group.keywords);
        }
        lowercase_all(&mut self.spam_indicators);
        lowercase_all(&mut self.senior_titles);
        lowercase_all(&mut self.actionable_words);
        self
    }

    /// Role cluster for a free-text position; first match wins.
    pub fn classify_role(&self, position: &str) -> &str {
        first_match(&self.role_clusters, position).unwrap_or(OTHER_ROLE)
    }

    /// Industry bucket for a company name; first match wins.
    pub fn classify_industry(&self, company: &str) -> &str {
        first_match(&self.industries, company).unwrap_or(OTHER_INDUSTRY)
    }

    /// How many distinct indicator phrases appear in `text`.
    pub fn spam_indicator_count(&self, text: &str) -> usize {
        let lowered = text.to_lowercase();
        self.spam_indicators
            .iter()
            .filter(|ind| lowered.contains(ind.as_str()))
            .count()
    }

    /// Noise if two or more indicators appear, or one appears in a short message.
    pub fn is_spam(&self, text: &str) -> bool {
        let hits = self.spam_indicator_count(text);
        hits >= 2 || (hits >= 1 && text.chars().count() < SHORT_MESSAGE_CHARS)
    }

    pub fn is_senior(&self, position: &str) -> bool {
        let lowered = position.to_lowercase();
        self.senior_titles
            .iter()
            .any(|kw| lowered.contains(kw.as_str()))
    }

    pub fn is_actionable(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.actionable_words
            .iter()
            .any(|kw| lowered.contains(kw.as_str()))
    }
}
