use crate::classifier::{ Classifier, Intent };
use crate::cli::Args;
use crate::config::rules::{ self, RuleConfig };
use crate::error::ChatError;
use crate::strategy::{
    ArithmeticStrategy,
    ConversationalStrategy,
    RandomPicker,
    ReplyPicker,
    SearchStrategy,
    Strategy,
};

use log::{ debug, info };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Classifier plus one strategy per intent. Holds no per-conversation
/// state, so one instance can serve every session.
#[derive(Clone, Debug)]
pub struct ChatAgent {
    classifier: Classifier,
    arithmetic: ArithmeticStrategy,
    search: SearchStrategy,
    conversational: ConversationalStrategy,
}

impl ChatAgent {
    pub fn new(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let rules = rules::resolve_rules(args.rules_path.as_deref())?;
        let search_url = Url::parse(&args.search_url).map_err(|e|
            format!("Invalid search URL '{}': {}", args.search_url, e)
        )?;
        let agent = Self::from_rules(&rules, search_url, args.http_timeout(), Arc::new(RandomPicker))?;
        info!(
            "Chat agent configured: {} classification rules, search endpoint {}",
            agent.classifier.rules().len(),
            agent.search.endpoint()
        );
        Ok(agent)
    }

    pub fn from_rules(
        rules: &RuleConfig,
        search_url: Url,
        http_timeout: Duration,
        picker: Arc<dyn ReplyPicker>
    ) -> Result<Self, ChatError> {
        Ok(Self {
            classifier: Classifier::from_rules(rules),
            arithmetic: ArithmeticStrategy::new(),
            search: SearchStrategy::new(search_url, http_timeout, &rules.search_keywords)?,
            conversational: ConversationalStrategy::new(rules, picker),
        })
    }

    pub fn classify(&self, message: &str) -> Intent {
        self.classifier.classify(message)
    }

    fn strategy_for(&self, intent: Intent) -> &dyn Strategy {
        match intent {
            Intent::Arithmetic => &self.arithmetic,
            Intent::Search => &self.search,
            Intent::Conversational => &self.conversational,
        }
    }

    pub async fn process_message(&self, message: &str) -> String {
        let intent = self.classify(message);
        debug!("Classified message as {}", intent);
        let strategy = self.strategy_for(intent);
        strategy.respond(message).await
    }
}
