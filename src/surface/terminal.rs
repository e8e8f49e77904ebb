use async_trait::async_trait;
use log::{ debug, error };
use std::io::{ self, Write };
use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::{ Arc, Mutex };
use tokio::io::{ AsyncBufReadExt, AsyncRead, BufReader };
use tokio::sync::{ mpsc, Mutex as TokioMutex };

use super::Surface;
use crate::models::chat::{ ConversationLog, Message, Role };

const LINE_BUFFER: usize = 32;

/// Line-oriented chat surface. Lines are read from an async reader (stdin in
/// the binary) and every rendered message is written as one block, newest last.
pub struct TerminalSurface {
    log: Mutex<ConversationLog>,
    input: Mutex<String>,
    enabled: Arc<AtomicBool>,
    out: Mutex<Box<dyn Write + Send>>,
    lines: TokioMutex<mpsc::Receiver<String>>,
}

impl TerminalSurface {
    /// Must be called inside a tokio runtime; the reader runs as its own task.
    pub fn from_reader<R>(out: Box<dyn Write + Send>, reader: R) -> Self
        where R: AsyncRead + Unpin + Send + 'static
    {
        let enabled = Arc::new(AtomicBool::new(true));
        let lines = spawn_line_reader(reader, Arc::clone(&enabled));
        Self {
            log: Mutex::new(ConversationLog::new()),
            input: Mutex::new(String::new()),
            enabled,
            out: Mutex::new(out),
            lines: TokioMutex::new(lines),
        }
    }

    /// Surface wired to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::from_reader(Box::new(io::stdout()), tokio::io::stdin())
    }

    /// Next submitted line, or `None` once the input stream closes.
    pub async fn next_line(&self) -> Option<String> {
        self.lines.lock().await.recv().await
    }

    pub fn notice(&self, text: &str) {
        self.write_block(&format!("* {}", text));
    }

    fn write_block(&self, text: &str) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            error!("Failed to write to terminal: {}", e);
        }
    }
}

pub fn render_message(message: &Message) -> String {
    let speaker = match message.role() {
        Role::User => "you",
        Role::Assistant => "bot",
    };
    format!("[{}] {}: {}", message.timestamp(), speaker, message.text())
}

/// Forwards lines until EOF. Lines read while input is disabled are dropped.
fn spawn_line_reader<R>(reader: R, enabled: Arc<AtomicBool>) -> mpsc::Receiver<String>
    where R: AsyncRead + Unpin + Send + 'static
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if !enabled.load(Ordering::Acquire) {
                        debug!("Dropping line typed while input is disabled");
                        continue;
                    }
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

#[async_trait]
impl Surface for TerminalSurface {
    fn append_message(&self, message: Message) {
        self.write_block(&render_message(&message));
        if let Ok(mut log) = self.log.lock() {
            log.push(message);
        }
    }

    fn read_input(&self) -> String {
        self.input
            .lock()
            .map(|input| input.clone())
            .unwrap_or_default()
    }

    fn clear_input(&self) {
        if let Ok(mut input) = self.input.lock() {
            input.clear();
        }
    }

    fn set_input(&self, text: &str) {
        if let Ok(mut input) = self.input.lock() {
            *input = text.to_string();
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        debug!("Terminal input {}", if enabled { "enabled" } else { "disabled" });
    }

    fn focus_input(&self) {
        let hint = self.read_input();
        if !hint.is_empty() {
            self.write_block(&format!("> {}", hint));
        }
    }

    fn clear_log(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
        self.write_block("----------------------------------------");
    }

    async fn confirm(&self, prompt: &str) -> bool {
        self.write_block(&format!("{} (y/n)", prompt));
        match self.next_line().await {
            Some(answer) => {
                matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "بله" | "آره")
            }
            None => false,
        }
    }
}
