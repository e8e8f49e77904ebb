use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use std::error::Error as StdError;
use std::time::Duration;
use url::Url;

use super::ChatBackend;
use crate::error::ChatError;
use crate::models::api::{ ChatRequest, ChatResponse };

const CHAT_ROUTE: &str = "/chat";

/// Delegates every message to a chat server's `/chat` endpoint.
#[derive(Debug, Clone)]
pub struct RemoteChatClient {
    http: HttpClient,
    endpoint: Url,
}

impl RemoteChatClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), CHAT_ROUTE);
        let endpoint = Url::parse(&url).map_err(|e|
            format!("Invalid remote chat URL '{}': {}", url, e)
        )?;
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for RemoteChatClient {
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        let req = ChatRequest { message: message.to_string() };
        let resp = self.http.post(self.endpoint.clone()).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::Remote(format!("{} returned {}", self.endpoint, status)));
        }
        let body = resp.bytes().await?;
        let data: ChatResponse = serde_json::from_slice(&body)?;
        debug!("Remote chat replied with {} bytes", data.response.len());
        Ok(data.response)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{ Matcher, Server };
    use tokio::net::TcpListener;

    #[test]
    fn appends_chat_route_to_base_url() {
        let client = RemoteChatClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:5000/chat");
        assert!(RemoteChatClient::new("::nope::", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn posts_message_and_returns_response_field() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .match_body(Matcher::Json(serde_json::json!({"message": "سلام"})))
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "درود"}"#)
            .create_async().await;

        let client = RemoteChatClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert_eq!(client.reply("سلام").await.unwrap(), "درود");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_remote_error() {
        let mut server = Server::new_async().await;
        let _mock = server.mock("POST", "/chat").with_status(500).create_async().await;

        let client = RemoteChatClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert!(matches!(client.reply("hi").await, Err(ChatError::Remote(_))));
    }

    #[tokio::test]
    async fn body_without_response_field_is_parse_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_body(r#"{"answer": "wrong shape"}"#)
            .create_async().await;

        let client = RemoteChatClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        assert!(matches!(client.reply("hi").await, Err(ChatError::Parse(_))));
    }

    #[tokio::test]
    async fn silent_server_hits_the_client_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = RemoteChatClient::new(&format!("http://{}", addr), Duration::from_secs(1)).unwrap();
        match client.reply("hi").await {
            Err(ChatError::Http(e)) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {:?}", other),
        }
    }
}
