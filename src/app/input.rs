use super::*;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;
use tracing::{debug, info, warn};

use super::render::{copy_text_for_line, line_index_for_row};
use super::scroll::SCROLL_STEP;

pub(crate) const DEBUG_TOGGLE_KEY: KeyCode = KeyCode::F(12);
pub(crate) const DEBUG_TOGGLE_LABEL: &str = "F12";

fn is_key_input(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.kind != KeyEventKind::Release)
}

fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

impl App {
    /// Apply one poll's worth of events. More than one key event in the batch
    /// is taken as a paste burst: Enter then inserts a space instead of
    /// sending, so a pasted block cannot fire several sends.
    pub(super) fn dispatch_events(&mut self, events: Vec<Event>) {
        let burst = events.iter().filter(|e| is_key_input(e)).count() > 1;
        for event in events {
            self.handle_event(event, burst);
            if self.should_quit {
                return;
            }
        }
    }

    fn handle_event(&mut self, event: Event, burst: bool) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key, burst),
            Event::Mouse(mouse) if !self.debug_mode => self.handle_mouse(mouse),
            Event::Paste(text) if !self.debug_mode => self.handle_paste(&text),
            _ => {}
        }
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent, burst: bool) {
        if key.code == DEBUG_TOGGLE_KEY {
            self.debug_mode = !self.debug_mode;
            debug!(enabled = self.debug_mode, "debug overlay toggled");
            return;
        }
        if self.debug_mode {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter if burst => self.input.push(' '),
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c)
                if is_printable_ascii(c) && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.input.push(c);
            }
            _ => {}
        }
    }

    /// Send the input buffer if it holds anything besides whitespace.
    pub(super) fn submit_input(&mut self) {
        let message = self.input.trim();
        if message.is_empty() {
            return;
        }
        let message = message.to_string();
        info!(chars = message.len(), "sending message");
        self.send_to_agent(&message);
        self.push_message(Author::Human, message);
        self.input.clear();
    }

    pub(super) fn handle_paste(&mut self, raw: &str) {
        let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
        self.input.extend(
            normalized
                .chars()
                .filter(|&c| c == '\n' || is_printable_ascii(c)),
        );
    }

    pub(super) fn handle_mouse(&mut self, mouse: MouseEvent) {
        let geometry = self.layout.geometry();
        let at = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                if geometry.chat.contains(at) {
                    self.chat_scroll.scroll_up(SCROLL_STEP);
                } else if geometry.sidebar.contains(at) {
                    self.sidebar_scroll.scroll_up(SCROLL_STEP);
                }
            }
            MouseEventKind::ScrollDown => {
                if geometry.chat.contains(at) {
                    self.chat_scroll.scroll_down(SCROLL_STEP);
                } else if geometry.sidebar.contains(at) {
                    self.sidebar_scroll.scroll_down(SCROLL_STEP);
                }
            }
            MouseEventKind::Down(MouseButton::Middle) if geometry.chat.contains(at) => {
                self.copy_chat_row(mouse.row - geometry.chat.y);
            }
            _ => {}
        }
    }

    /// Copy the message (or code block) under `row_in_pane` of the chat pane.
    pub(super) fn copy_chat_row(&mut self, row_in_pane: u16) {
        let geometry = self.layout.geometry();
        let Some(index) = line_index_for_row(
            row_in_pane,
            self.chat_scroll.offset(),
            geometry.chat_rows(),
            self.chat_lines.len(),
        ) else {
            return;
        };
        let Some(text) = copy_text_for_line(&self.chat_lines, &self.messages, index) else {
            return;
        };
        match self.clipboard.copy(&text) {
            Ok(method) => {
                debug!(method = method.label(), chars = text.len(), "copied to clipboard");
                self.set_status(format!("copied {} chars", text.chars().count()));
            }
            Err(err) => {
                warn!(error = %err, "clipboard copy failed");
                self.set_status("copy failed: no clipboard");
            }
        }
    }
}
