use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;
use thiserror::Error;
use log::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rules file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rules JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid rules file: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CannedReply {
    pub trigger: String,
    pub reply: String,
}

impl CannedReply {
    fn new(trigger: &str, reply: &str) -> Self {
        Self { trigger: trigger.to_string(), reply: reply.to_string() }
    }
}

/// Keyword tables driving classification and the conversational replies.
/// Any field left out of a rules file keeps its built-in value.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RuleConfig {
    pub arithmetic_keywords: Vec<String>,
    pub search_keywords: Vec<String>,
    pub canned_replies: Vec<CannedReply>,
    pub fallback_replies: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            arithmetic_keywords: to_strings(
                &[
                    "حساب",
                    "ریاضی",
                    "جمع",
                    "تفریق",
                    "ضرب",
                    "تقسیم",
                    "محاسبه",
                    "مسئله",
                    "معادله",
                    "calculate",
                    "math",
                    "add",
                    "subtract",
                    "multiply",
                    "divide",
                    "equation",
                ]
            ),
            search_keywords: to_strings(
                &[
                    "جستجو",
                    "پیدا کن",
                    "اخبار",
                    "جدید",
                    "به روز",
                    "سرچ",
                    "search",
                    "find",
                    "news",
                    "latest",
                    "update",
                    "information",
                    "info",
                ]
            ),
            canned_replies: vec![
                CannedReply::new("سلام", "سلام! چطور می‌توانم کمک کنم؟"),
                CannedReply::new("خداحافظ", "خداحافظ! خوشحال می‌شوم اگر باز هم کمک لازم داشتید."),
                CannedReply::new("تشکر", "خواهش می‌کنم! خوشحالم که توانستم کمک کنم."),
                CannedReply::new(
                    "اسم تو چیست",
                    "من یک هوش مصنوعی چت هستم که برای کمک به شما طراحی شده‌ام."
                ),
                CannedReply::new(
                    "چه کاری می توانی انجام دهی",
                    "من می‌توانم در موضوعات مختلف گفتگو کنم، مسائل ریاضی را حل کنم و اطلاعاتی را جستجو کنم."
                ),
                CannedReply::new(
                    "کمک",
                    "برای محاسبه یک عبارت مثل 2+2 بنویسید، یا با کلمه «جستجو» موضوعی را جستجو کنید."
                ),
                CannedReply::new(
                    "help",
                    "برای محاسبه یک عبارت مثل 2+2 بنویسید، یا با کلمه «جستجو» موضوعی را جستجو کنید."
                )
            ],
            fallback_replies: to_strings(
                &[
                    "جالب است! در این مورد بیشتر بگویید.",
                    "منظورتان را متوجه نشدم. می‌توانید واضح‌تر توضیح دهید؟",
                    "در این مورد اطلاعاتی دارم، اما شاید بتوانم با جستجو اطلاعات بیشتری پیدا کنم.",
                    "متأسفم، هنوز در حال یادگیری هستم و ممکن است نتوانم به همه سوالات پاسخ دهم.",
                ]
            ),
        }
    }
}

impl RuleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_replies.is_empty() {
            return Err(ConfigError::Invalid("fallback_replies must not be empty".to_string()));
        }
        let blank = self.arithmetic_keywords
            .iter()
            .chain(self.search_keywords.iter())
            .chain(self.canned_replies.iter().map(|c| &c.trigger))
            .any(|k| k.trim().is_empty());
        if blank {
            return Err(ConfigError::Invalid("keywords and triggers must not be blank".to_string()));
        }
        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn load_rules_from_str(json: &str) -> Result<RuleConfig, ConfigError> {
    let config: RuleConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

pub fn load_rules<P: AsRef<Path>>(path: P) -> Result<RuleConfig, ConfigError> {
    let json = fs::read_to_string(path.as_ref())?;
    let config = load_rules_from_str(&json)?;
    info!(
        "Loaded rules from {}: {} arithmetic keywords, {} search keywords, {} canned replies",
        path.as_ref().display(),
        config.arithmetic_keywords.len(),
        config.search_keywords.len(),
        config.canned_replies.len()
    );
    Ok(config)
}

/// Loads the rules file when one is configured, otherwise the built-in tables.
pub fn resolve_rules(path: Option<&str>) -> Result<RuleConfig, ConfigError> {
    match path {
        Some(p) if !p.trim().is_empty() => load_rules(p),
        _ => {
            info!("No rules file configured, using built-in rules.");
            Ok(RuleConfig::default())
        }
    }
}
