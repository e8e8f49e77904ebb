use log::{ error, info, warn };
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::Arc;

use crate::backend::ChatBackend;
use crate::error::GENERIC_ERROR_REPLY;
use crate::models::chat::Message;
use crate::surface::Surface;

pub const MATH_HINT: &str = "لطفاً یک مسئله ریاضی وارد کنید (مثلاً 2+2)";
pub const SEARCH_HINT: &str = "لطفاً موضوعی برای جستجو وارد کنید";
pub const CLEAR_CONFIRM_PROMPT: &str = "آیا از پاک کردن تاریخچه چت مطمئن هستید؟";
pub const CLEARED_REPLY: &str = "همه مکالمات پاک شدند. چگونه می‌توانم کمک کنم؟";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing rendered.
    Ignored,
    /// Another send is still in flight.
    Busy,
    Answered,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Math,
    Search,
    Clear,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseQuickActionError {
    message: String,
}

impl fmt::Display for ParseQuickActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseQuickActionError {}

impl FromStr for QuickAction {
    type Err = ParseQuickActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "math" | "ریاضی" => Ok(QuickAction::Math),
            "search" | "جستجو" => Ok(QuickAction::Search),
            "clear" | "پاک کردن" => Ok(QuickAction::Clear),
            _ =>
                Err(ParseQuickActionError {
                    message: format!("Unknown quick action: '{}'", s),
                }),
        }
    }
}

/// Re-enables the input and returns to Idle when the send finishes, fails,
/// or its future is dropped.
struct InFlight<'a, S: Surface + ?Sized> {
    sending: &'a AtomicBool,
    surface: &'a S,
}

impl<S: Surface + ?Sized> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        self.surface.set_input_enabled(true);
        self.surface.focus_input();
        self.sending.store(false, Ordering::Release);
    }
}

pub struct Dispatcher {
    backend: Arc<dyn ChatBackend>,
    sending: AtomicBool,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            sending: AtomicBool::new(false),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn state(&self) -> DispatchState {
        if self.sending.load(Ordering::Acquire) {
            DispatchState::Sending
        } else {
            DispatchState::Idle
        }
    }

    /// Sends whatever is in the surface's input. At most one send is in
    /// flight at a time; the input stays disabled until the reply is rendered.
    pub async fn send<S: Surface + ?Sized>(&self, surface: &S) -> SendOutcome {
        if self.state() == DispatchState::Sending {
            warn!("Send rejected: a request is already in flight");
            return SendOutcome::Busy;
        }
        let raw = surface.read_input();
        let message = raw.trim();
        if message.is_empty() {
            return SendOutcome::Ignored;
        }
        if
            self.sending
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
        {
            warn!("Send rejected: a request is already in flight");
            return SendOutcome::Busy;
        }
        let _guard = InFlight { sending: &self.sending, surface };

        surface.append_message(Message::user(message));
        surface.clear_input();
        surface.set_input_enabled(false);

        match self.backend.reply(message).await {
            Ok(reply) => {
                surface.append_message(Message::assistant(reply));
                SendOutcome::Answered
            }
            Err(e) => {
                error!("Error from {} backend: {}", self.backend.name(), e);
                surface.append_message(Message::assistant(GENERIC_ERROR_REPLY));
                SendOutcome::Failed
            }
        }
    }

    pub async fn quick_action<S: Surface + ?Sized>(&self, action: QuickAction, surface: &S) {
        match action {
            QuickAction::Math => {
                surface.set_input(MATH_HINT);
                surface.focus_input();
            }
            QuickAction::Search => {
                surface.set_input(SEARCH_HINT);
                surface.focus_input();
            }
            QuickAction::Clear => {
                if surface.confirm(CLEAR_CONFIRM_PROMPT).await {
                    surface.clear_log();
                    surface.append_message(Message::assistant(CLEARED_REPLY));
                    info!("Conversation log cleared");
                }
            }
        }
    }
}
