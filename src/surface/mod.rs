pub mod terminal;

use async_trait::async_trait;

use crate::models::chat::Message;

pub use terminal::TerminalSurface;

/// The display and input controls the dispatcher drives: a message log,
/// one text input, and a confirmation prompt.
#[async_trait]
pub trait Surface: Send + Sync {
    fn append_message(&self, message: Message);

    fn read_input(&self) -> String;

    fn clear_input(&self);

    /// Replaces the input text, e.g. with a hint from a quick action.
    fn set_input(&self, text: &str);

    fn set_input_enabled(&self, enabled: bool);

    fn focus_input(&self) {}

    fn clear_log(&self);

    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
