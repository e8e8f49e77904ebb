use log::info;

use crate::dispatcher::{ Dispatcher, QuickAction, SendOutcome };
use crate::surface::{ Surface, TerminalSurface };

const HELP: &str =
    "Type a message and press Enter. Commands: /math (/ریاضی), /search (/جستجو), /clear (/پاک کردن), /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Message(String),
    Quick(QuickAction),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(name) = trimmed.strip_prefix('/') else {
        return Command::Message(line.to_string());
    };
    match name.trim().to_lowercase().as_str() {
        "quit" | "exit" => Command::Quit,
        "help" | "?" => Command::Help,
        other =>
            match other.parse::<QuickAction>() {
                Ok(action) => Command::Quick(action),
                // Not a known command: treat "/2*3" and the like as a message.
                Err(_) if other.starts_with(|c: char| c.is_ascii_digit() || c == '(') => {
                    Command::Message(line.to_string())
                }
                Err(_) => Command::Help,
            }
    }
}

/// Reads lines until the input closes or `/quit`, routing each through the
/// dispatcher. Returns the number of answered or failed sends.
pub async fn run_repl(dispatcher: &Dispatcher, surface: &TerminalSurface) -> usize {
    surface.notice(&format!("intent-chat ({} backend). {}", dispatcher.backend_name(), HELP));
    let mut turns = 0;

    while let Some(line) = surface.next_line().await {
        match parse_command(&line) {
            Command::Quit => {
                break;
            }
            Command::Help => surface.notice(HELP),
            Command::Quick(action) => dispatcher.quick_action(action, surface).await,
            Command::Message(text) => {
                surface.set_input(&text);
                match dispatcher.send(surface).await {
                    SendOutcome::Answered | SendOutcome::Failed => {
                        turns += 1;
                    }
                    SendOutcome::Ignored | SendOutcome::Busy => {}
                }
                surface.clear_input();
            }
        }
    }

    info!("Chat session ended after {} turns", turns);
    turns
}
