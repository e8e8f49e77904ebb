use async_trait::async_trait;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

use super::Strategy;
use crate::classifier::Intent;
use crate::config::rules::{ CannedReply, RuleConfig };

/// Chooses an index into the fallback pool.
pub trait ReplyPicker: Send + Sync {
    /// Returns a value in `0..len`; `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl ReplyPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

#[derive(Clone)]
pub struct ConversationalStrategy {
    canned: Vec<CannedReply>,
    fallback: Vec<String>,
    picker: Arc<dyn ReplyPicker>,
}

impl fmt::Debug for ConversationalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationalStrategy")
            .field("canned", &self.canned.len())
            .field("fallback", &self.fallback.len())
            .finish()
    }
}

impl ConversationalStrategy {
    pub fn new(config: &RuleConfig, picker: Arc<dyn ReplyPicker>) -> Self {
        let canned = config.canned_replies
            .iter()
            .map(|c| CannedReply {
                trigger: c.trigger.to_lowercase(),
                reply: c.reply.clone(),
            })
            .collect();
        Self {
            canned,
            fallback: config.fallback_replies.clone(),
            picker,
        }
    }

    pub fn fallback_replies(&self) -> &[String] {
        &self.fallback
    }

    pub fn canned_reply(&self, message: &str) -> Option<&str> {
        let lowered = message.to_lowercase();
        self.canned
            .iter()
            .find(|c| lowered.contains(c.trigger.as_str()))
            .map(|c| c.reply.as_str())
    }

    pub fn reply(&self, message: &str) -> String {
        if let Some(reply) = self.canned_reply(message) {
            return reply.to_string();
        }
        if self.fallback.is_empty() {
            return String::new();
        }
        let idx = self.picker.pick(self.fallback.len()).min(self.fallback.len() - 1);
        self.fallback[idx].clone()
    }
}

#[async_trait]
impl Strategy for ConversationalStrategy {
    fn intent(&self) -> Intent {
        Intent::Conversational
    }

    async fn respond(&self, message: &str) -> String {
        self.reply(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{ AtomicUsize, Ordering };

    struct FixedPicker(usize);

    impl ReplyPicker for FixedPicker {
        fn pick(&self, _len: usize) -> usize {
            self.0
        }
    }

    struct CyclingPicker(AtomicUsize);

    impl ReplyPicker for CyclingPicker {
        fn pick(&self, len: usize) -> usize {
            self.0.fetch_add(1, Ordering::SeqCst) % len
        }
    }

    fn strategy(picker: Arc<dyn ReplyPicker>) -> ConversationalStrategy {
        ConversationalStrategy::new(&RuleConfig::default(), picker)
    }

    #[test]
    fn canned_trigger_matches_by_containment() {
        let s = strategy(Arc::new(FixedPicker(0)));
        assert_eq!(s.reply("سلام دوست من"), "سلام! چطور می‌توانم کمک کنم؟");
        assert_eq!(s.reply("ممنون، تشکر زیاد"), "خواهش می‌کنم! خوشحالم که توانستم کمک کنم.");
    }

    #[test]
    fn first_matching_trigger_wins() {
        let s = strategy(Arc::new(FixedPicker(0)));
        // Contains both "سلام" and "خداحافظ"; "سلام" is listed first.
        assert_eq!(s.reply("خداحافظ و سلام"), "سلام! چطور می‌توانم کمک کنم؟");
    }

    #[test]
    fn triggers_are_case_insensitive() {
        let s = strategy(Arc::new(FixedPicker(0)));
        assert!(s.canned_reply("HELP me").is_some());
    }

    #[test]
    fn unknown_input_uses_injected_picker() {
        let s = strategy(Arc::new(FixedPicker(2)));
        assert_eq!(s.reply("یک جمله ناشناخته"), s.fallback_replies()[2]);
    }

    #[test]
    fn out_of_range_pick_is_clamped() {
        let s = strategy(Arc::new(FixedPicker(99)));
        assert_eq!(s.reply("???"), s.fallback_replies()[3]);
    }

    #[test]
    fn cycling_picker_visits_whole_pool() {
        let s = strategy(Arc::new(CyclingPicker(AtomicUsize::new(0))));
        let replies: Vec<String> = (0..4).map(|_| s.reply("nothing matches")).collect();
        assert_eq!(replies, s.fallback_replies().to_vec());
    }

    #[test]
    fn random_replies_are_pool_members_and_roughly_uniform() {
        let s = strategy(Arc::new(RandomPicker));
        let pool = s.fallback_replies().to_vec();
        let mut counts = vec![0usize; pool.len()];
        let samples = 4000;
        for _ in 0..samples {
            let reply = s.reply("nothing matches");
            let idx = pool.iter().position(|p| *p == reply).expect("reply is in the pool");
            counts[idx] += 1;
        }
        let expected = samples / pool.len();
        for count in counts {
            assert!(count > expected / 2 && count < expected * 3 / 2, "count {}", count);
        }
    }
}
