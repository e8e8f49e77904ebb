pub mod arithmetic;
pub mod conversational;
pub mod expr;
pub mod search;

use async_trait::async_trait;

use crate::classifier::Intent;

pub use arithmetic::ArithmeticStrategy;
pub use conversational::{ ConversationalStrategy, RandomPicker, ReplyPicker };
pub use search::SearchStrategy;

/// A responder for one intent. Implementations recover from their own
/// failures and always hand back a reply for the conversation.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn intent(&self) -> Intent;

    async fn respond(&self, message: &str) -> String;
}
