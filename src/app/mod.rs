use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::config::Config;

const DEBUG_LOG_CAPACITY: usize = 1000;

mod clipboard;
mod input;
mod layout;
mod render;
mod runtime;
mod scroll;
#[cfg(test)]
mod tests;
mod text;
mod types;
pub(crate) mod ui;
mod worker;

pub(crate) use clipboard::{Clipboard, SystemClipboard};
#[cfg(test)]
use clipboard::CopyMethod;
use layout::LayoutManager;
pub(crate) use runtime::run_app;
use scroll::ScrollState;
use text::sanitize_runtime_text;
pub(crate) use types::{AgentReply, ToolCall, ToolCallRecord, ToolCalls};
use types::{default_palette, Author, DisplayLine, Message, SidebarLine, ThemePalette};
pub(crate) use worker::ChannelAdapter;

#[derive(Clone, Debug)]
struct StatusMessage {
    text: String,
    expires_at: Instant,
}

/// All mutable view state. Owned by the render thread and handed by
/// reference to the layout, render and dispatch code each tick.
pub(crate) struct App {
    palette: ThemePalette,
    status_ttl: Duration,
    should_quit: bool,
    debug_mode: bool,

    input: String,
    messages: Vec<Message>,
    tool_calls: Vec<ToolCall>,

    layout: LayoutManager,
    chat_scroll: ScrollState,
    sidebar_scroll: ScrollState,
    /// Rows drawn on the last frame; click mapping reads these.
    chat_lines: Vec<DisplayLine>,
    sidebar_lines: Vec<SidebarLine>,

    channel: ChannelAdapter,
    agent_connected: bool,
    clipboard: Box<dyn Clipboard>,

    log_rx: Option<Receiver<String>>,
    debug_log: VecDeque<String>,
    status: Option<StatusMessage>,
}

impl App {
    pub(crate) fn new(
        config: &Config,
        channel: ChannelAdapter,
        clipboard: Box<dyn Clipboard>,
        log_rx: Option<Receiver<String>>,
    ) -> Self {
        Self {
            palette: default_palette(),
            status_ttl: config.status_ttl,
            should_quit: false,
            debug_mode: false,
            input: String::new(),
            messages: Vec::new(),
            tool_calls: Vec::new(),
            layout: LayoutManager::new(config.sidebar),
            chat_scroll: ScrollState::default(),
            sidebar_scroll: ScrollState::default(),
            chat_lines: Vec::new(),
            sidebar_lines: Vec::new(),
            channel,
            agent_connected: true,
            clipboard,
            log_rx,
            debug_log: VecDeque::new(),
            status: None,
        }
    }

    fn push_message(&mut self, author: Author, text: impl Into<String>) {
        self.messages.push(Message {
            text: text.into(),
            author,
        });
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            expires_at: Instant::now() + self.status_ttl,
        });
    }

    pub(super) fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    fn expire_status(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|s| now >= s.expires_at) {
            self.status = None;
        }
    }

    /// Move captured log lines into the ring shown by the debug overlay.
    fn drain_debug_log(&mut self) {
        let Some(rx) = self.log_rx.as_ref() else {
            return;
        };
        for line in rx.try_iter() {
            if self.debug_log.len() == DEBUG_LOG_CAPACITY {
                self.debug_log.pop_front();
            }
            self.debug_log.push_back(line);
        }
    }

    /// Recompute geometry and flattened lines for the coming frame and
    /// re-clamp both scroll offsets against them.
    pub(super) fn prepare_frame(&mut self, width: u16, height: u16) {
        self.layout.update(height, width, &self.input);
        let geometry = self.layout.geometry();

        self.chat_lines = render::flatten_messages(&self.messages, geometry.chat_text_width());
        self.chat_scroll.sync(self.chat_lines.len(), geometry.chat_rows());

        self.sidebar_lines =
            render::flatten_tool_calls(&self.tool_calls, geometry.sidebar_text_width());
        self.sidebar_scroll.sync(self.sidebar_lines.len(), geometry.sidebar_rows());
    }
}
