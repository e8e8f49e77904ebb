use async_trait::async_trait;
use intent_chat::agent::ChatAgent;
use intent_chat::backend::remote::RemoteChatClient;
use intent_chat::backend::ChatBackend;
use intent_chat::classifier::Intent;
use intent_chat::config::RuleConfig;
use intent_chat::dispatcher::{ Dispatcher, SendOutcome };
use intent_chat::error::GENERIC_ERROR_REPLY;
use intent_chat::models::chat::{ ConversationLog, Message, Role };
use intent_chat::server::api::router;
use intent_chat::strategy::ReplyPicker;
use intent_chat::surface::Surface;
use mockito::{ Matcher, Server };
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

struct LastPicker;

impl ReplyPicker for LastPicker {
    fn pick(&self, len: usize) -> usize {
        len - 1
    }
}

#[derive(Default)]
struct MemorySurface {
    log: Mutex<ConversationLog>,
    input: Mutex<String>,
    enabled: Mutex<bool>,
}

impl MemorySurface {
    fn type_text(&self, text: &str) {
        *self.input.lock().unwrap() = text.to_string();
    }

    fn last_reply(&self) -> Option<String> {
        self.log
            .lock()
            .unwrap()
            .last()
            .filter(|m| m.role() == Role::Assistant)
            .map(|m| m.text().to_string())
    }

    fn messages(&self) -> Vec<Message> {
        self.log.lock().unwrap().iter().cloned().collect()
    }
}

#[async_trait]
impl Surface for MemorySurface {
    fn append_message(&self, message: Message) {
        self.log.lock().unwrap().push(message);
    }

    fn read_input(&self) -> String {
        self.input.lock().unwrap().clone()
    }

    fn clear_input(&self) {
        self.input.lock().unwrap().clear();
    }

    fn set_input(&self, text: &str) {
        self.type_text(text);
    }

    fn set_input_enabled(&self, enabled: bool) {
        *self.enabled.lock().unwrap() = enabled;
    }

    fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

fn agent_with_search(search_url: &str) -> ChatAgent {
    ChatAgent::from_rules(
        &RuleConfig::default(),
        Url::parse(search_url).unwrap(),
        Duration::from_secs(5),
        Arc::new(LastPicker)
    ).unwrap()
}

#[tokio::test]
async fn local_dispatch_covers_every_intent() {
    let mut search = Server::new_async().await;
    let _mock = search
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("q".into(), "زبان راست".into()))
        .with_body(r#"{"AbstractText": "Rust یک زبان برنامه‌نویسی است.", "RelatedTopics": []}"#)
        .create_async().await;

    let agent = agent_with_search(&format!("{}/", search.url()));
    assert_eq!(agent.classify("جستجو زبان راست"), Intent::Search);

    let dispatcher = Dispatcher::new(Arc::new(agent));
    let surface = MemorySurface::default();

    surface.type_text("محاسبه کن (2+3)*4");
    assert_eq!(dispatcher.send(&surface).await, SendOutcome::Answered);
    assert!(surface.last_reply().unwrap().ends_with("(2+3)*4 = 20"));

    surface.type_text("جستجو زبان راست");
    assert_eq!(dispatcher.send(&surface).await, SendOutcome::Answered);
    assert_eq!(
        surface.last_reply().unwrap(),
        "نتایج جستجو برای \"زبان راست\":\nRust یک زبان برنامه‌نویسی است."
    );

    surface.type_text("یک حرف عجیب");
    dispatcher.send(&surface).await;
    assert_eq!(surface.last_reply().unwrap(), *RuleConfig::default().fallback_replies.last().unwrap());

    let messages = surface.messages();
    assert_eq!(messages.len(), 6);
    assert!(messages.iter().all(|m| !m.timestamp().is_empty()));
    assert_eq!(messages[0].text(), "محاسبه کن (2+3)*4");
    assert!(*surface.enabled.lock().unwrap());
}

#[tokio::test]
async fn remote_backend_round_trips_through_chat_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(agent_with_search("http://127.0.0.1:9/")));
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    let client = RemoteChatClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    assert_eq!(client.reply("سلام").await.unwrap(), "سلام! چطور می‌توانم کمک کنم؟");

    let dispatcher = Dispatcher::new(Arc::new(client));
    let surface = MemorySurface::default();
    surface.type_text("12/4");
    assert_eq!(dispatcher.send(&surface).await, SendOutcome::Answered);
    assert!(surface.last_reply().unwrap().ends_with("12/4 = 3"));
}

#[tokio::test]
async fn unreachable_remote_renders_generic_error() {
    let client = RemoteChatClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(client));
    let surface = MemorySurface::default();
    surface.type_text("hello?");

    assert_eq!(dispatcher.send(&surface).await, SendOutcome::Failed);
    assert_eq!(surface.last_reply().unwrap(), GENERIC_ERROR_REPLY);
    assert!(*surface.enabled.lock().unwrap());
}

#[tokio::test]
async fn hung_remote_times_out_and_reenables_input() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = RemoteChatClient::new(&format!("http://{}", addr), Duration::from_secs(1)).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(client));
    let surface = MemorySurface::default();
    surface.type_text("are you there?");

    assert_eq!(dispatcher.send(&surface).await, SendOutcome::Failed);
    assert_eq!(surface.last_reply().unwrap(), GENERIC_ERROR_REPLY);
    assert!(*surface.enabled.lock().unwrap());
}
