use once_cell::sync::Lazy;
use regex::Regex;
use serde::{ Deserialize, Serialize };
use std::fmt;

use crate::config::rules::RuleConfig;

/// Any digit or operator character; the arithmetic strategy keeps the same set.
static NUMERIC_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9+\-*/()]").expect("numeric expression pattern is valid")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Arithmetic,
    Search,
    Conversational,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Arithmetic => write!(f, "arithmetic"),
            Intent::Search => write!(f, "search"),
            Intent::Conversational => write!(f, "conversational"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Trigger {
    /// Matches when the lowercased text contains the keyword.
    Keyword(String),
    Pattern(Regex),
}

impl Trigger {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Trigger::Keyword(keyword) => lowered.contains(keyword.as_str()),
            Trigger::Pattern(re) => re.is_match(lowered),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Rule {
    pub intent: Intent,
    pub trigger: Trigger,
}

impl Rule {
    /// ASCII keywords only match whole words ("add" is not found in
    /// "address"). Other keywords match anywhere in the text.
    pub fn keyword(intent: Intent, keyword: &str) -> Self {
        let keyword = keyword.to_lowercase();
        if keyword.is_ascii() {
            if let Some(re) = whole_word(&keyword) {
                return Self::pattern(intent, re);
            }
        }
        Self { intent, trigger: Trigger::Keyword(keyword) }
    }

    pub fn pattern(intent: Intent, pattern: Regex) -> Self {
        Self { intent, trigger: Trigger::Pattern(pattern) }
    }
}

/// Ordered rule list; the first rule that matches decides the intent and
/// anything unmatched is conversational.
#[derive(Clone, Debug)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Arithmetic keywords, then the numeric pattern, then search keywords.
    pub fn from_rules(config: &RuleConfig) -> Self {
        let mut rules: Vec<Rule> = config.arithmetic_keywords
            .iter()
            .map(|k| Rule::keyword(Intent::Arithmetic, k))
            .collect();
        rules.push(Rule::pattern(Intent::Arithmetic, (*NUMERIC_EXPRESSION).clone()));
        rules.extend(config.search_keywords.iter().map(|k| Rule::keyword(Intent::Search, k)));
        Self::new(rules)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn classify(&self, text: &str) -> Intent {
        let lowered = fold_digits(text).to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.trigger.matches(&lowered))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Conversational)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_rules(&RuleConfig::default())
    }
}

fn whole_word(keyword: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword))).ok()
}

/// Rewrites Persian and Arabic-Indic digits as ASCII digits.
pub fn fold_digits(text: &str) -> String {
    text.chars()
        .map(|c| {
            match c {
                '\u{06F0}'..='\u{06F9}' => char::from(b'0' + ((c as u32) - 0x06f0) as u8),
                '\u{0660}'..='\u{0669}' => char::from(b'0' + ((c as u32) - 0x0660) as u8),
                other => other,
            }
        })
        .collect()
}
