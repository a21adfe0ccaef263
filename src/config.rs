use std::time::Duration;

use tracing::warn;

const DEFAULT_TICK_MS: u64 = 10;
const MAX_TICK_MS: u64 = 250;
const DEFAULT_STATUS_SECS: u64 = 3;
const DEFAULT_SHELL: &str = "sh";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SidebarMode {
    /// Sidebar spans the whole terminal height, beside chat and input.
    FullHeight,
    /// Sidebar stops at the chat pane; the input pane spans the full width.
    ChatHeight,
}

impl SidebarMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full" | "full-height" => Some(SidebarMode::FullHeight),
            "chat" | "chat-height" => Some(SidebarMode::ChatHeight),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Config {
    /// Agent process command line. `None` runs this binary with `--agent`.
    pub(crate) agent_command: Option<Vec<String>>,
    pub(crate) tick: Duration,
    pub(crate) sidebar: SidebarMode,
    pub(crate) status_ttl: Duration,
    pub(crate) shell: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_command: None,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            sidebar: SidebarMode::FullHeight,
            status_ttl: Duration::from_secs(DEFAULT_STATUS_SECS),
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

impl Config {
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(raw) = var("CHATTY_AGENT_CMD") {
            let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
            config.agent_command = Some(parts);
        }
        if let Some(raw) = var("CHATTY_TICK_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => config.tick = Duration::from_millis(ms.clamp(1, MAX_TICK_MS)),
                Err(_) => warn!(value = %raw, "ignoring invalid CHATTY_TICK_MS"),
            }
        }
        if let Some(raw) = var("CHATTY_SIDEBAR") {
            match SidebarMode::parse(&raw) {
                Some(mode) => config.sidebar = mode,
                None => warn!(value = %raw, "ignoring invalid CHATTY_SIDEBAR"),
            }
        }
        if let Some(raw) = var("CHATTY_STATUS_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => config.status_ttl = Duration::from_secs(secs),
                Err(_) => warn!(value = %raw, "ignoring invalid CHATTY_STATUS_SECS"),
            }
        }
        if let Some(raw) = var("CHATTY_SHELL") {
            config.shell = raw;
        }
        config
    }
}
