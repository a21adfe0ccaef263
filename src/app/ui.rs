use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::input::DEBUG_TOGGLE_LABEL;
use super::layout::{CHAT_MARGIN, INPUT_CONTINUATION, INPUT_PREFIX, INPUT_PREFIX_WIDTH};
use super::render::split_code_frame;
use super::text::{clip_chars, wrap_input};
use super::types::{Author, DisplayLine, SidebarLine, SidebarLineKind, ThemePalette};
use super::App;

/// Draw one frame. Every write is clipped to its pane, and the caller's
/// `Terminal::draw` flushes the whole frame at once.
pub(crate) fn draw(f: &mut Frame, app: &App) {
    let screen = f.area();
    let geometry = app.layout.geometry();

    if app.debug_mode {
        draw_debug(f, app, geometry.debug.intersection(screen));
        return;
    }

    draw_chat(f, app, geometry.chat.intersection(screen));
    draw_sidebar(f, app, geometry.sidebar.intersection(screen));
    draw_input(f, app, geometry.input.intersection(screen));
}

fn panel_block(theme: ThemePalette, title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .title(Span::styled(format!(" {} ", title), theme.title_style()))
}

/// Cut a row of spans down to `width` columns.
fn clip_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Span<'static>> {
    let mut remaining = width;
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        if remaining == 0 {
            break;
        }
        let len = span.content.chars().count();
        if len <= remaining {
            remaining -= len;
            out.push(span);
        } else {
            let clipped = clip_chars(&span.content, remaining).to_string();
            out.push(Span::styled(clipped, span.style));
            remaining = 0;
        }
    }
    out
}

fn chat_line(line: &DisplayLine, width: usize, theme: ThemePalette) -> Line<'static> {
    let Some(author) = line.author else {
        return Line::default();
    };
    let len = line.text.chars().count();
    let margin = CHAT_MARGIN as usize;
    let x = match author {
        Author::Human => width.saturating_sub(len + margin),
        Author::Ai => margin,
    };

    let mut spans = vec![Span::raw(" ".repeat(x))];
    if line.is_code() {
        let (left, inner, right) = split_code_frame(&line.text);
        spans.push(Span::raw(left.to_string()));
        spans.push(Span::styled(inner.to_string(), theme.code_style()));
        spans.push(Span::raw(right.to_string()));
    } else {
        spans.push(Span::styled(line.text.clone(), theme.author_style(author)));
    }
    Line::from(clip_spans(spans, width))
}

fn draw_chat(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.palette;
    let block = panel_block(theme, "chat");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let lines: Vec<Line> = app
        .chat_lines
        .iter()
        .skip(app.chat_scroll.offset())
        .take(inner.height as usize)
        .map(|line| chat_line(line, width, theme))
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn sidebar_line(line: &SidebarLine, width: usize, theme: ThemePalette) -> Line<'static> {
    let style = match line.kind {
        SidebarLineKind::Command => theme.command_style(),
        SidebarLineKind::Output => theme.output_style(),
        SidebarLineKind::Blank => Style::default(),
    };
    Line::from(Span::styled(clip_chars(&line.text, width).to_string(), style))
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.palette;
    let mut block = panel_block(theme, "shell");
    if let Some(status) = app.status_text() {
        block = block.title_bottom(Span::styled(format!(" {status} "), theme.status_style()));
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let lines: Vec<Line> = app
        .sidebar_lines
        .iter()
        .skip(app.sidebar_scroll.offset())
        .take(inner.height as usize)
        .map(|line| sidebar_line(line, width, theme))
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.palette;
    let block = panel_block(theme, "message");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Oldest rows scroll out of view; the buffer itself is untouched.
    let geometry = app.layout.geometry();
    let rows = wrap_input(&app.input, geometry.input_text_width());
    let visible = geometry.input_rows().min(inner.height as usize);
    let start = rows.len().saturating_sub(visible);
    let shown = &rows[start..];

    let width = inner.width as usize;
    let lines: Vec<Line> = shown
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let prefix = if i == 0 { INPUT_PREFIX } else { INPUT_CONTINUATION };
            let spans = vec![
                Span::styled(prefix.to_string(), theme.prompt_style()),
                Span::styled(row.clone(), theme.input_style()),
            ];
            Line::from(clip_spans(spans, width))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);

    let last_len = shown.last().map(|row| row.chars().count()).unwrap_or(0) as u16;
    let cursor_x = (inner.x + INPUT_PREFIX_WIDTH + last_len).min(inner.right().saturating_sub(1));
    let cursor_y = inner.y + (shown.len() as u16).saturating_sub(1);
    f.set_cursor_position((cursor_x, cursor_y));
}

fn draw_debug(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.palette;
    let block = panel_block(theme, "debug log");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let body = Rect {
        height: inner.height - 1,
        ..inner
    };
    let footer = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };

    if app.debug_log.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("(no log lines yet)", theme.muted_style())),
            body,
        );
    } else {
        // Each entry needs at least one row, so this tail is always enough.
        let skip = app.debug_log.len().saturating_sub(body.height as usize);
        let lines: Vec<Line> = app
            .debug_log
            .iter()
            .skip(skip)
            .map(|line| Line::from(line.clone()))
            .collect();
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        let rows = paragraph.line_count(body.width);
        let scroll = rows.saturating_sub(body.height as usize);
        let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
        f.render_widget(paragraph.scroll((scroll, 0)), body);
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            format!("{DEBUG_TOGGLE_LABEL} close debug log"),
            theme.muted_style(),
        )),
        footer,
    );
}
