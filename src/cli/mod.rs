use clap::Parser;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Repl,
    Serve,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseModeError {
    message: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "repl" => Ok(Mode::Repl),
            "serve" | "server" => Ok(Mode::Serve),
            _ =>
                Err(ParseModeError {
                    message: format!("Invalid mode: '{}' (expected repl or serve)", s),
                }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Repl => write!(f, "repl"),
            Mode::Serve => write!(f, "serve"),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- General App Args ---
    /// Run an interactive terminal chat (repl) or the HTTP /chat server (serve)
    #[arg(long, env = "APP_MODE", default_value = "repl")]
    pub mode: Mode,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Optional path to a JSON rules file (keywords, canned and fallback replies).
    #[arg(long, env = "RULES_PATH")] // No default, built-in rules are used if None
    pub rules_path: Option<String>,

    // --- Backend Args ---
    /// Where replies come from in the terminal chat (local, remote)
    #[arg(long, env = "CHAT_BACKEND", default_value = "local")]
    pub backend: String,

    /// Base URL of a remote chat server; replies are fetched from <url>/chat
    #[arg(long, env = "REMOTE_CHAT_URL", default_value = "http://127.0.0.1:5000")]
    pub remote_url: String,

    // --- Search Args ---
    /// Instant-answer search API endpoint.
    #[arg(long, env = "SEARCH_URL", default_value = "https://api.duckduckgo.com/")]
    pub search_url: String,

    /// Timeout in seconds for outbound HTTP calls (search and remote chat).
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    pub http_timeout_secs: u64,

    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:5000")]
    pub server_addr: String,
}

impl Args {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_local_repl() {
        let args = Args::parse_from(["intent-chat"]);
        assert_eq!(args.mode, Mode::Repl);
        assert_eq!(args.backend, "local");
        assert_eq!(args.http_timeout(), Duration::from_secs(10));
        assert!(args.rules_path.is_none());
    }

    #[test]
    fn parses_serve_mode_and_overrides() {
        let args = Args::parse_from(
            [
                "intent-chat",
                "--mode",
                "serve",
                "--server-addr",
                "0.0.0.0:8080",
                "--http-timeout-secs",
                "0",
            ]
        );
        assert_eq!(args.mode, Mode::Serve);
        assert_eq!(args.server_addr, "0.0.0.0:8080");
        assert_eq!(args.http_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!("daemon".parse::<Mode>().is_err());
        assert_eq!("SERVE".parse::<Mode>(), Ok(Mode::Serve));
    }
}
