use async_trait::async_trait;
use log::{ error, info };
use regex::Regex;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::Strategy;
use crate::classifier::Intent;
use crate::error::ChatError;

pub const DEFAULT_SEARCH_URL: &str = "https://api.duckduckgo.com/";

/// Subset of the instant-answer payload that the reply is built from.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    pub abstract_text: Option<String>,
    #[serde(rename = "RelatedTopics", default)]
    pub related_topics: Option<Vec<RelatedTopic>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RelatedTopic {
    #[serde(rename = "Text", default)]
    pub text: Option<String>,
}

impl InstantAnswer {
    /// The abstract when present, otherwise the first related topic with text.
    pub fn best_text(&self) -> Option<&str> {
        non_blank(self.abstract_text.as_deref()).or_else(|| {
            self.related_topics
                .as_deref()
                .unwrap_or_default()
                .iter()
                .find_map(|topic| non_blank(topic.text.as_deref()))
        })
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct SearchStrategy {
    http: HttpClient,
    endpoint: Url,
    triggers: Option<Regex>,
}

impl SearchStrategy {
    pub fn new(endpoint: Url, timeout: Duration, keywords: &[String]) -> Result<Self, ChatError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, endpoint, keywords))
    }

    pub fn with_client(http: HttpClient, endpoint: Url, keywords: &[String]) -> Self {
        Self {
            http,
            endpoint,
            triggers: trigger_pattern(keywords),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Removes every trigger keyword and squeezes the remaining whitespace.
    pub fn derive_query(&self, message: &str) -> String {
        let stripped = match &self.triggers {
            Some(re) => re.replace_all(message, " ").into_owned(),
            None => message.to_string(),
        };
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub async fn lookup(&self, query: &str) -> Result<InstantAnswer, ChatError> {
        let resp = self.http
            .get(self.endpoint.clone())
            .query(
                &[
                    ("q", query),
                    ("format", "json"),
                    ("no_html", "1"),
                    ("skip_disambig", "1"),
                ]
            )
            .send().await?
            .error_for_status()?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice::<InstantAnswer>(&body)?)
    }

    pub async fn try_respond(&self, message: &str) -> Result<String, ChatError> {
        let query = self.derive_query(message);
        if query.is_empty() {
            return Err(ChatError::EmptyQuery);
        }
        info!("Searching instant answers for '{}'", query);
        let answer = self.lookup(&query).await?;
        Ok(match answer.best_text() {
            Some(text) => format!("نتایج جستجو برای \"{}\":\n{}", query, text),
            None => format!("هیچ نتیجه‌ای برای \"{}\" پیدا نکردم.", query),
        })
    }
}

fn trigger_pattern(keywords: &[String]) -> Option<Regex> {
    let mut sorted: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if sorted.is_empty() {
        return None;
    }
    // Longest first so "information" is removed whole rather than as "info".
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    let alternation = sorted
        .iter()
        .map(|k| {
            let escaped = regex::escape(k);
            if k.is_ascii() { format!(r"\b{}\b", escaped) } else { escaped }
        })
        .collect::<Vec<_>>()
        .join("|");
    match Regex::new(&format!("(?i){}", alternation)) {
        Ok(re) => Some(re),
        Err(e) => {
            error!("Failed to build search trigger pattern: {}", e);
            None
        }
    }
}

#[async_trait]
impl Strategy for SearchStrategy {
    fn intent(&self) -> Intent {
        Intent::Search
    }

    async fn respond(&self, message: &str) -> String {
        match self.try_respond(message).await {
            Ok(reply) => reply,
            Err(ChatError::EmptyQuery) => ChatError::EmptyQuery.user_message().to_string(),
            Err(e) => {
                error!("Search error: {}", e);
                e.user_message().to_string()
            }
        }
    }
}
