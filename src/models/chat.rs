use chrono::Local;
use serde::{ Deserialize, Serialize };
use std::fmt;

const TIMESTAMP_FORMAT: &str = "%H:%M";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: String,
    role: Role,
    timestamp: String,
}

impl Message {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Role::User)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, Role::Assistant)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Chronological record of the rendered session. Entries are only ever
/// appended; the whole log may be cleared at once.
#[derive(Clone, Debug, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
