pub mod remote;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use log::info;

use crate::agent::ChatAgent;
use crate::cli::Args;
use crate::error::ChatError;
use self::remote::RemoteChatClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Local,
    Remote,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseBackendTypeError {
    message: String,
}

impl fmt::Display for ParseBackendTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseBackendTypeError {}

impl FromStr for BackendType {
    type Err = ParseBackendTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(BackendType::Local),
            "remote" => Ok(BackendType::Remote),
            _ =>
                Err(ParseBackendTypeError {
                    message: format!("Invalid chat backend: '{}'", s),
                }),
        }
    }
}

/// Produces the assistant's reply to one user message.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn reply(&self, message: &str) -> Result<String, ChatError>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl ChatBackend for ChatAgent {
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        Ok(self.process_message(message).await)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

pub fn new_backend(args: &Args) -> Result<Arc<dyn ChatBackend>, Box<dyn StdError + Send + Sync>> {
    let backend_type: BackendType = args.backend.parse()?;
    let backend: Arc<dyn ChatBackend> = match backend_type {
        BackendType::Local => Arc::new(ChatAgent::new(args)?),
        BackendType::Remote => {
            let client = RemoteChatClient::new(&args.remote_url, args.http_timeout())?;
            info!("Remote chat backend configured: {}", client.endpoint());
            Arc::new(client)
        }
    };
    Ok(backend)
}
