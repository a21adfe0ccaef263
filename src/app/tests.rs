use super::*;
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use crossbeam_channel::{unbounded, Sender};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

use super::input::DEBUG_TOGGLE_KEY;
use super::layout::{compute_geometry, Geometry};
use super::render::{
    copy_text_for_line, flatten_messages, flatten_tool_calls, line_index_for_row,
};
use super::scroll::{clamp, max_offset};
use super::text::wrap_words;
use super::types::SidebarLineKind;
use crate::config::SidebarMode;

#[derive(Clone, Default)]
struct RecordingClipboard {
    copies: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl Clipboard for RecordingClipboard {
    fn copy(&mut self, text: &str) -> anyhow::Result<CopyMethod> {
        if self.fail {
            return Err(anyhow!("no clipboard"));
        }
        self.copies.borrow_mut().push(text.to_string());
        Ok(CopyMethod::Native)
    }
}

struct Harness {
    app: App,
    human_rx: Receiver<String>,
    agent_tx: Sender<AgentReply>,
    copies: Rc<RefCell<Vec<String>>>,
    log_tx: Sender<String>,
}

fn harness_with(clipboard: RecordingClipboard, config: Config) -> Harness {
    let (human_tx, human_rx) = unbounded();
    let (agent_tx, agent_rx) = unbounded();
    let (log_tx, log_rx) = unbounded();
    let copies = clipboard.copies.clone();
    let app = App::new(
        &config,
        ChannelAdapter::new(human_tx, agent_rx),
        Box::new(clipboard),
        Some(log_rx),
    );
    Harness {
        app,
        human_rx,
        agent_tx,
        copies,
        log_tx,
    }
}

fn harness() -> Harness {
    harness_with(RecordingClipboard::default(), Config::default())
}

fn message(author: Author, text: &str) -> Message {
    Message {
        text: text.to_string(),
        author,
    }
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn reply(calls: &[(&str, &str)], text: &str) -> AgentReply {
    AgentReply {
        tool_calls: ToolCalls::Single(ToolCallRecord {
            calls: calls
                .iter()
                .map(|(command, output)| ToolCall {
                    command: command.to_string(),
                    output: output.to_string(),
                })
                .collect(),
        }),
        text: text.to_string(),
    }
}

fn draw(app: &mut App, width: u16, height: u16) -> Buffer {
    app.prepare_frame(width, height);
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    terminal.draw(|f| ui::draw(f, app)).expect("draw");
    terminal.backend().buffer().clone()
}

fn row_text(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol().to_string())
        .collect()
}

fn column_of(row: &str, needle: &str) -> Option<usize> {
    row.find(needle).map(|byte| row[..byte].chars().count())
}

fn chat_max_offset(app: &App) -> usize {
    max_offset(app.chat_lines.len(), app.layout.geometry().chat_rows())
}

// ---- line flattening ----

#[test]
fn wrap_keeps_every_word_in_order() {
    let text = "the quick brown fox jumps over the lazy dog and keeps running far away";
    for width in [7, 10, 17, 40, 200] {
        let lines = wrap_words(text, width);
        assert!(lines.iter().all(|l| l.chars().count() <= width), "width {width}");
        assert_eq!(lines.join(" "), text, "width {width}");
    }
}

#[test]
fn wrap_force_breaks_words_longer_than_width() {
    let lines = wrap_words("ab abcdefghij cd", 4);
    assert_eq!(lines, vec!["ab", "abcd", "efgh", "ij", "cd"]);
}

#[test]
fn paragraphs_and_blank_lines_survive_flattening() {
    let messages = vec![message(Author::Ai, "first line\n\nthird line")];
    let lines = flatten_messages(&messages, 40);
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();

    assert_eq!(texts, vec!["first line", "", "third line", ""]);
    assert_eq!(
        texts[..3].join("\n"),
        messages[0].text,
        "reassembled content must match the message"
    );
}

#[test]
fn every_message_is_followed_by_one_separator() {
    let messages = vec![
        message(Author::Human, "hello there"),
        message(Author::Ai, "general kenobi"),
    ];
    let lines = flatten_messages(&messages, 40);

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], DisplayLine::separator(0));
    assert_eq!(lines[3], DisplayLine::separator(1));
    assert_eq!(lines[0].author, Some(Author::Human));
    assert_eq!(lines[2].author, Some(Author::Ai));
}

#[test]
fn empty_message_yields_single_blank_line() {
    let lines = flatten_messages(&[message(Author::Ai, "")], 20);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "");
    assert_eq!(lines[0].author, Some(Author::Ai));
    assert_eq!(lines[1].author, None);
}

#[test]
fn flattening_is_idempotent() {
    let messages = vec![
        message(Author::Human, "run ls please"),
        message(Author::Ai, "sure:\n```\nls -la\n```\ndone"),
    ];
    assert_eq!(
        flatten_messages(&messages, 12),
        flatten_messages(&messages, 12)
    );
}

#[test]
fn code_block_rows_are_framed_and_fit_the_pane() {
    let messages = vec![message(
        Author::Ai,
        "look:\n```rust\nfn main() {}\n    let x = 1;\n```\nbye",
    )];
    let lines = flatten_messages(&messages, 30);
    let code: Vec<&DisplayLine> = lines.iter().filter(|l| l.is_code()).collect();

    assert_eq!(code.len(), 2);
    assert_eq!(code[0].text, "│ fn main() {}   │");
    assert_eq!(code[1].text, "│     let x = 1; │");
    assert!(lines.iter().all(|l| !l.text.contains("```")));
    assert!(lines.iter().all(|l| l.text.chars().count() <= 30));
    assert_eq!(lines.last().map(|l| l.author), Some(None));
}

#[test]
fn long_code_rows_wrap_inside_the_frame() {
    let messages = vec![message(Author::Ai, "```\n0123456789abcdef\n```")];
    let lines = flatten_messages(&messages, 10);
    let code: Vec<&str> = lines
        .iter()
        .filter(|l| l.is_code())
        .map(|l| l.text.as_str())
        .collect();

    assert_eq!(code, vec!["│ 012345 │", "│ 6789ab │", "│ cdef   │"]);
}

#[test]
fn copying_a_wrapped_code_line_rejoins_it() {
    let command = "find . -name '*.rs' -exec grep -n unwrap {} + | sort | uniq -c";
    let messages = vec![message(Author::Ai, &format!("```\n{command}\necho ok\n```"))];
    let lines = flatten_messages(&messages, 30);
    assert!(lines.iter().filter(|l| l.is_code()).count() > 3);

    let expected = format!("{command}\necho ok");
    for index in 0..lines.len() - 1 {
        assert_eq!(
            copy_text_for_line(&lines, &messages, index).as_deref(),
            Some(expected.as_str()),
            "row {index}"
        );
    }
}

#[test]
fn copied_code_keeps_its_own_trailing_spaces() {
    let messages = vec![message(Author::Ai, "```\nab  \nlonger line\n```")];
    let lines = flatten_messages(&messages, 40);

    assert_eq!(lines[0].text, "│ ab          │");
    assert_eq!(
        copy_text_for_line(&lines, &messages, 0).as_deref(),
        Some("ab  \nlonger line")
    );
}

#[test]
fn copy_takes_only_the_clicked_code_block() {
    let messages = vec![message(Author::Ai, "```\none\n```\nbetween\n```\ntwo\n```")];
    let lines = flatten_messages(&messages, 40);

    assert_eq!(copy_text_for_line(&lines, &messages, 0).as_deref(), Some("one"));
    assert_eq!(copy_text_for_line(&lines, &messages, 2).as_deref(), Some("two"));
}

#[test]
fn tool_calls_flatten_to_command_output_and_padding() {
    let calls = vec![ToolCall {
        command: "ls".to_string(),
        output: "a.txt\nb.txt\n".to_string(),
    }];
    let lines = flatten_tool_calls(&calls, 10);
    let kinds: Vec<SidebarLineKind> = lines.iter().map(|l| l.kind).collect();

    assert_eq!(
        kinds,
        vec![
            SidebarLineKind::Command,
            SidebarLineKind::Output,
            SidebarLineKind::Output,
            SidebarLineKind::Blank
        ]
    );
    assert_eq!(lines[0].text, "$ ls");
    assert_eq!(lines[1].text, "a.txt     ");
    assert_eq!(lines[2].text, "b.txt     ");
}

// ---- scrolling ----

#[test]
fn clamp_stays_in_range_and_is_idempotent() {
    for total in 0..30 {
        for visible in 0..12 {
            for offset in 0..40 {
                let once = clamp(offset, total, visible);
                assert!(once <= max_offset(total, visible));
                assert_eq!(clamp(once, total, visible), once);
            }
        }
    }
}

#[test]
fn pinned_chat_follows_new_replies() {
    let mut h = harness();
    for i in 0..30 {
        h.app.push_message(Author::Ai, format!("message {i}"));
    }
    h.app.prepare_frame(100, 20);
    assert_eq!(h.app.chat_scroll.offset(), chat_max_offset(&h.app));
    let before = h.app.chat_scroll.offset();

    for i in 0..3 {
        h.agent_tx.send(reply(&[], &format!("reply {i}"))).expect("send");
    }
    assert!(h.app.poll_agent());
    h.app.prepare_frame(100, 20);

    assert!(h.app.chat_scroll.offset() > before);
    assert_eq!(h.app.chat_scroll.offset(), chat_max_offset(&h.app));
}

#[test]
fn scrolled_up_chat_is_not_yanked_by_new_replies() {
    let mut h = harness();
    for i in 0..30 {
        h.app.push_message(Author::Ai, format!("message {i}"));
    }
    h.app.prepare_frame(100, 20);
    h.app.dispatch_events(vec![mouse(MouseEventKind::ScrollUp, 10, 5)]);
    let scrolled = h.app.chat_scroll.offset();
    assert_eq!(scrolled, chat_max_offset(&h.app) - 3);

    h.agent_tx.send(reply(&[], "late reply")).expect("send");
    h.app.poll_agent();
    h.app.prepare_frame(100, 20);

    assert_eq!(h.app.chat_scroll.offset(), scrolled);
    assert!(h.app.chat_scroll.offset() < chat_max_offset(&h.app));
}

#[test]
fn scrolling_back_to_bottom_pins_again() {
    let mut h = harness();
    for i in 0..30 {
        h.app.push_message(Author::Ai, format!("message {i}"));
    }
    h.app.prepare_frame(100, 20);
    h.app.chat_scroll.scroll_up(3);
    h.app.chat_scroll.scroll_down(100);
    assert!(h.app.chat_scroll.is_at_bottom());

    h.app.push_message(Author::Ai, "another");
    h.app.prepare_frame(100, 20);
    assert_eq!(h.app.chat_scroll.offset(), chat_max_offset(&h.app));
}

#[test]
fn resize_that_reaches_the_bottom_pins_again() {
    let mut h = harness();
    for i in 0..30 {
        h.app.push_message(Author::Ai, format!("message {i}"));
    }
    h.app.prepare_frame(40, 20);
    h.app.dispatch_events(vec![mouse(MouseEventKind::ScrollUp, 5, 5)]);
    assert!(h.app.chat_scroll.offset() < chat_max_offset(&h.app));

    // Taller pane: the clamp alone puts the offset at the bottom.
    h.app.prepare_frame(200, 60);
    assert_eq!(h.app.chat_scroll.offset(), chat_max_offset(&h.app));

    for i in 0..20 {
        h.app.push_message(Author::Ai, format!("late {i}"));
    }
    h.app.prepare_frame(200, 60);
    assert_eq!(h.app.chat_scroll.offset(), chat_max_offset(&h.app));
    assert!(h.app.chat_scroll.offset() > 0);
}

#[test]
fn wheel_over_sidebar_scrolls_only_the_sidebar() {
    let mut h = harness();
    for i in 0..20 {
        let command = format!("cmd {i}");
        h.agent_tx
            .send(reply(&[(command.as_str(), "out")], "ok"))
            .expect("send");
    }
    h.app.poll_agent();
    h.app.prepare_frame(100, 20);
    let chat_before = h.app.chat_scroll.offset();
    let sidebar_before = h.app.sidebar_scroll.offset();

    h.app.dispatch_events(vec![mouse(MouseEventKind::ScrollUp, 90, 5)]);

    assert_eq!(h.app.chat_scroll.offset(), chat_before);
    assert_eq!(h.app.sidebar_scroll.offset(), sidebar_before - 3);
}

// ---- layout ----

#[test]
fn sidebar_takes_a_quarter_of_wide_terminals() {
    let g = compute_geometry(30, 100, "", SidebarMode::FullHeight);
    assert_eq!(g.sidebar.width, 25);
    assert_eq!(g.chat.width, 75);
    assert_eq!(g.input.width, 75);
}

#[test]
fn sidebar_never_narrower_than_twenty_columns() {
    let g = compute_geometry(30, 60, "", SidebarMode::FullHeight);
    assert_eq!(g.sidebar.width, 20);
    assert_eq!(g.chat.width, 40);
}

fn area(g: &Geometry) -> u32 {
    [g.chat, g.sidebar, g.input]
        .iter()
        .map(|r| r.width as u32 * r.height as u32)
        .sum()
}

#[test]
fn panes_tile_the_terminal_in_both_sidebar_modes() {
    for mode in [SidebarMode::FullHeight, SidebarMode::ChatHeight] {
        let g = compute_geometry(30, 100, "some input", mode);
        assert_eq!(area(&g), 100 * 30, "{mode:?}");
        assert!(!g.chat.intersects(g.sidebar));
        assert!(!g.chat.intersects(g.input));
        assert!(!g.sidebar.intersects(g.input));
        assert_eq!(g.debug, ratatui::layout::Rect::new(0, 0, 100, 30));
    }
}

#[test]
fn chat_height_sidebar_leaves_input_full_width() {
    let g = compute_geometry(30, 100, "", SidebarMode::ChatHeight);
    assert_eq!(g.sidebar.height, g.chat.height);
    assert_eq!(g.input.width, 100);
}

#[test]
fn input_pane_grows_with_wrapped_input_and_is_capped() {
    let g = compute_geometry(30, 100, "", SidebarMode::FullHeight);
    assert_eq!(g.input.height, 3);
    assert_eq!(g.chat.height, 27);

    // 71 text columns: 75 wide pane minus borders and the "> " prefix.
    let g = compute_geometry(30, 100, &"x".repeat(150), SidebarMode::FullHeight);
    assert_eq!(g.input.height, 5);

    let g = compute_geometry(10, 100, &"line\n".repeat(20), SidebarMode::FullHeight);
    assert_eq!(g.input.height, 7);
    assert_eq!(g.chat.height, 3);
}

#[test]
fn layout_manager_reports_changes_only() {
    let mut layout = LayoutManager::new(SidebarMode::FullHeight);
    assert!(layout.update(30, 100, ""));
    assert!(!layout.update(30, 100, "short"));
    assert!(layout.update(30, 100, &"x".repeat(150)));
    assert!(layout.update(40, 100, &"x".repeat(150)));
}

#[test]
fn tiny_terminal_renders_without_panicking() {
    let mut h = harness();
    h.app.input = "some text that will not fit".to_string();
    h.app.push_message(Author::Human, "hi");
    for (w, hgt) in [(10, 4), (30, 5), (1, 1)] {
        let _ = draw(&mut h.app, w, hgt);
    }
}

// ---- input dispatch ----

#[test]
fn enter_sends_message_and_clears_input() {
    let mut h = harness();
    h.app.input = "hello".to_string();

    h.app.dispatch_events(vec![key(KeyCode::Enter)]);

    assert_eq!(h.human_rx.try_recv().expect("sent"), "hello");
    assert_eq!(h.app.messages, vec![message(Author::Human, "hello")]);
    assert!(h.app.input.is_empty());
}

#[test]
fn enter_on_blank_input_does_nothing() {
    for input in ["", "   \n  "] {
        let mut h = harness();
        h.app.input = input.to_string();

        h.app.dispatch_events(vec![key(KeyCode::Enter)]);

        assert!(h.human_rx.try_recv().is_err());
        assert!(h.app.messages.is_empty());
    }
}

#[test]
fn enter_inside_a_burst_becomes_a_space() {
    let mut h = harness();
    h.app.dispatch_events(vec![
        key(KeyCode::Char('a')),
        key(KeyCode::Enter),
        key(KeyCode::Char('b')),
    ]);

    assert_eq!(h.app.input, "a b");
    assert!(h.human_rx.try_recv().is_err());
    assert!(h.app.messages.is_empty());
}

#[test]
fn typing_and_backspace_edit_the_buffer() {
    let mut h = harness();
    h.app.dispatch_events(vec![key(KeyCode::Backspace)]);
    assert!(h.app.input.is_empty());

    for c in "ls -la".chars() {
        h.app.dispatch_events(vec![key(KeyCode::Char(c))]);
    }
    h.app.dispatch_events(vec![key(KeyCode::Backspace)]);
    assert_eq!(h.app.input, "ls -l");

    h.app.dispatch_events(vec![key(KeyCode::Char('é'))]);
    assert_eq!(h.app.input, "ls -l");
}

#[test]
fn paste_keeps_newlines_and_never_sends() {
    let mut h = harness();
    let paste = Event::Paste("echo 1\r\necho 2\u{7}".to_string());
    h.app.dispatch_events(vec![paste]);

    assert_eq!(h.app.input, "echo 1\necho 2");
    assert!(h.human_rx.try_recv().is_err());
}

#[test]
fn escape_and_ctrl_c_quit() {
    let mut h = harness();
    h.app.dispatch_events(vec![key(KeyCode::Esc)]);
    assert!(h.app.should_quit);

    let mut h = harness();
    h.app.dispatch_events(vec![Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    ))]);
    assert!(h.app.should_quit);
}

#[test]
fn debug_mode_swallows_everything_but_the_toggle() {
    let mut h = harness();
    h.app.dispatch_events(vec![key(DEBUG_TOGGLE_KEY)]);
    assert!(h.app.debug_mode);

    h.app.dispatch_events(vec![key(KeyCode::Char('x'))]);
    h.app.dispatch_events(vec![key(KeyCode::Esc)]);
    h.app.dispatch_events(vec![Event::Paste("pasted".to_string())]);
    assert!(h.app.input.is_empty());
    assert!(!h.app.should_quit);

    h.app.dispatch_events(vec![key(DEBUG_TOGGLE_KEY)]);
    assert!(!h.app.debug_mode);
    h.app.dispatch_events(vec![key(KeyCode::Char('x'))]);
    assert_eq!(h.app.input, "x");
}

// ---- channel adapter ----

#[test]
fn agent_reply_fills_sidebar_and_chat() {
    let mut h = harness();
    h.agent_tx
        .send(reply(&[("ls", "a.txt\nb.txt")], "Done."))
        .expect("send");

    assert!(h.app.poll_agent());
    h.app.prepare_frame(100, 30);

    assert_eq!(h.app.messages, vec![message(Author::Ai, "Done.")]);
    assert_eq!(h.app.tool_calls.len(), 1);
    assert_eq!(h.app.tool_calls[0].command, "ls");
    let commands = h
        .app
        .sidebar_lines
        .iter()
        .filter(|l| l.kind == SidebarLineKind::Command)
        .count();
    assert_eq!(commands, 1);
}

#[test]
fn many_records_are_appended_in_order() {
    let mut h = harness();
    let record = |c: &str| ToolCallRecord {
        calls: vec![ToolCall {
            command: c.to_string(),
            output: String::new(),
        }],
    };
    h.agent_tx
        .send(AgentReply {
            tool_calls: ToolCalls::Many(vec![record("pwd"), record("ls"), record("pwd")]),
            text: "ok".to_string(),
        })
        .expect("send");

    h.app.poll_agent();

    let commands: Vec<&str> = h.app.tool_calls.iter().map(|c| c.command.as_str()).collect();
    assert_eq!(commands, vec!["pwd", "ls", "pwd"]);
}

#[test]
fn agent_text_is_sanitized() {
    let mut h = harness();
    h.agent_tx
        .send(reply(&[("ls", "\u{1b}[31mred\u{1b}[0m\tfile")], "ok\u{7}"))
        .expect("send");
    h.app.poll_agent();

    assert_eq!(h.app.tool_calls[0].output, "red    file");
    assert_eq!(h.app.messages[0].text, "ok");
}

#[test]
fn disconnected_agent_is_reported_once() {
    let Harness {
        mut app,
        agent_tx,
        ..
    } = harness();
    drop(agent_tx);

    assert!(!app.poll_agent());
    assert_eq!(app.status_text(), Some("agent disconnected"));
    app.status = None;
    app.poll_agent();
    assert_eq!(app.status_text(), None);
}

#[test]
fn send_with_closed_channel_still_records_message() {
    let Harness {
        mut app, human_rx, ..
    } = harness();
    drop(human_rx);
    app.input = "hello".to_string();

    app.dispatch_events(vec![key(KeyCode::Enter)]);

    assert_eq!(app.messages.len(), 1);
    assert_eq!(
        app.status_text(),
        Some("agent unavailable, message not delivered")
    );
}

// ---- click mapping and copy ----

#[test]
fn every_row_maps_back_to_its_message() {
    let messages: Vec<Message> = (0..6)
        .map(|i| message(Author::Ai, &format!("message number {i} with a few words")))
        .collect();
    let lines = flatten_messages(&messages, 10);
    let visible = 8;

    for offset in 0..=max_offset(lines.len(), visible) {
        for row in 1..=visible as u16 {
            let index = line_index_for_row(row, offset, visible, lines.len()).expect("in range");
            assert_eq!(index, row as usize - 1 + offset);
            let line = &lines[index];
            assert!(messages[line.source].text.contains(line.text.as_str()));
        }
    }
}

#[test]
fn out_of_range_rows_map_to_nothing() {
    assert_eq!(line_index_for_row(0, 0, 5, 10), None);
    assert_eq!(line_index_for_row(6, 0, 5, 10), None);
    assert_eq!(line_index_for_row(3, 0, 5, 2), None);
    assert_eq!(line_index_for_row(1, 4, 5, 10), Some(4));
}

#[test]
fn separator_rows_copy_nothing() {
    let messages = vec![message(Author::Human, "hi")];
    let lines = flatten_messages(&messages, 20);
    assert_eq!(copy_text_for_line(&lines, &messages, 1), None);
    assert_eq!(copy_text_for_line(&lines, &messages, 7), None);
}

#[test]
fn middle_click_on_prose_copies_the_unwrapped_message() {
    let mut h = harness();
    let text = "a long reply that will certainly wrap over several rows of a narrow pane";
    h.agent_tx.send(reply(&[], text)).expect("send");
    h.app.poll_agent();
    h.app.prepare_frame(44, 30);
    assert!(h.app.chat_lines.len() > 3);

    // Third wrapped row of the reply: pane row 3.
    let click = mouse(MouseEventKind::Down(MouseButton::Middle), 5, 3);
    h.app.dispatch_events(vec![click]);

    assert_eq!(h.copies.borrow().as_slice(), [text.to_string()]);
    assert_eq!(
        h.app.status_text(),
        Some(format!("copied {} chars", text.len()).as_str())
    );
}

#[test]
fn middle_click_on_code_copies_the_block_without_frame() {
    let mut h = harness();
    h.agent_tx
        .send(reply(&[], "see:\n```\nfn main() {}\n  let x = 1;\n```\nbye"))
        .expect("send");
    h.app.poll_agent();
    h.app.prepare_frame(100, 30);

    h.app.copy_chat_row(3);

    assert_eq!(
        h.copies.borrow().as_slice(),
        ["fn main() {}\n  let x = 1;".to_string()]
    );
}

#[test]
fn clipboard_failure_is_reported_not_fatal() {
    let mut h = harness_with(
        RecordingClipboard {
            fail: true,
            ..Default::default()
        },
        Config::default(),
    );
    h.app.push_message(Author::Human, "copy me");
    h.app.prepare_frame(100, 30);

    h.app.copy_chat_row(1);

    assert!(h.copies.borrow().is_empty());
    assert_eq!(h.app.status_text(), Some("copy failed: no clipboard"));
}

#[test]
fn status_message_expires() {
    let mut h = harness();
    h.app.set_status("copied 3 chars");
    h.app.expire_status(Instant::now());
    assert!(h.app.status_text().is_some());

    h.app.expire_status(Instant::now() + Duration::from_secs(60));
    assert!(h.app.status_text().is_none());
}

// ---- rendering ----

#[test]
fn human_lines_are_right_aligned_and_ai_lines_left_aligned() {
    let mut h = harness();
    h.app.push_message(Author::Human, "hello");
    h.app.push_message(Author::Ai, "hi there");
    let buffer = draw(&mut h.app, 100, 30);

    // Chat pane is 75 wide: inner width 73, one column of margin.
    let human_row = row_text(&buffer, 1);
    assert_eq!(column_of(&human_row, "hello"), Some(1 + 73 - 5 - 1));
    let ai_row = row_text(&buffer, 3);
    assert_eq!(column_of(&ai_row, "hi there"), Some(2));
}

#[test]
fn sidebar_shows_commands_and_outputs() {
    let mut h = harness();
    h.agent_tx
        .send(reply(&[("ls", "a.txt\nb.txt")], "Done."))
        .expect("send");
    h.app.poll_agent();
    let buffer = draw(&mut h.app, 100, 30);

    assert_eq!(column_of(&row_text(&buffer, 1), "$ ls"), Some(76));
    assert_eq!(column_of(&row_text(&buffer, 2), "a.txt"), Some(76));
    assert_eq!(column_of(&row_text(&buffer, 3), "b.txt"), Some(76));
}

#[test]
fn input_rows_use_prompt_then_indent() {
    let mut h = harness();
    h.app.input = "first\nsecond".to_string();
    let buffer = draw(&mut h.app, 100, 30);
    let input_y = h.app.layout.geometry().input.y;

    assert!(row_text(&buffer, input_y + 1).starts_with("│> first"));
    assert!(row_text(&buffer, input_y + 2).starts_with("│  second"));
}

#[test]
fn input_overflow_shows_newest_rows() {
    let mut h = harness();
    h.app.input = (0..30).map(|i| format!("row{i}")).collect::<Vec<_>>().join("\n");
    let buffer = draw(&mut h.app, 100, 12);
    let input = h.app.layout.geometry().input;

    assert_eq!(input.height, 9);
    let last_row = row_text(&buffer, input.y + input.height - 2);
    assert!(last_row.contains("row29"));
    assert!(h.app.input.starts_with("row0\n"));
}

#[test]
fn debug_overlay_replaces_panes_and_shows_log() {
    let mut h = harness();
    h.log_tx
        .send(" INFO chatty: agent process running".to_string())
        .expect("log");
    h.app.push_message(Author::Human, "hidden while debugging");
    h.app.dispatch_events(vec![key(DEBUG_TOGGLE_KEY)]);
    h.app.drain_debug_log();
    let buffer = draw(&mut h.app, 80, 20);

    let all: Vec<String> = (0..20).map(|y| row_text(&buffer, y)).collect();
    assert!(all.iter().any(|r| r.contains("agent process running")));
    assert!(all[18].contains("F12 close debug log"));
    assert!(all.iter().all(|r| !r.contains("hidden while debugging")));
}

#[test]
fn debug_log_ring_is_bounded() {
    let mut h = harness();
    for i in 0..DEBUG_LOG_CAPACITY + 5 {
        h.log_tx.send(format!("line {i}")).expect("log");
    }
    h.app.drain_debug_log();

    assert_eq!(h.app.debug_log.len(), DEBUG_LOG_CAPACITY);
    assert_eq!(h.app.debug_log.front().map(String::as_str), Some("line 5"));
}
