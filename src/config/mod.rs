pub mod rules;

pub use rules::{ load_rules, resolve_rules, CannedReply, ConfigError, RuleConfig };
