use super::text::{clip_chars, hard_wrap, pad_to, wrap_words};
use super::types::{
    Author, CodeRow, DisplayLine, Message, SidebarLine, SidebarLineKind, ToolCall,
};

pub(crate) const CODE_FENCE: &str = "```";
pub(crate) const CODE_BORDER_LEFT: &str = "│ ";
pub(crate) const CODE_BORDER_RIGHT: &str = " │";
const CODE_FRAME_WIDTH: usize = 4;
const COMMAND_PREFIX: &str = "$ ";

/// Flatten the message store into chat rows wrapped to `width` columns.
///
/// Every message contributes its wrapped paragraphs followed by one blank
/// separator row. Lines between ``` fences become framed code rows; the
/// fence lines themselves are not shown. The output depends only on the
/// arguments, so calling this twice without a mutation in between yields the
/// same rows.
pub(crate) fn flatten_messages(messages: &[Message], width: usize) -> Vec<DisplayLine> {
    let mut lines = Vec::new();
    for (idx, message) in messages.iter().enumerate() {
        push_message_lines(&mut lines, idx, message, width);
        lines.push(DisplayLine::separator(idx));
    }
    lines
}

fn push_message_lines(lines: &mut Vec<DisplayLine>, idx: usize, message: &Message, width: usize) {
    let author = message.author;
    let start = lines.len();
    let mut code_block: Option<Vec<&str>> = None;

    for paragraph in message.text.split('\n') {
        if paragraph.trim_start().starts_with(CODE_FENCE) {
            match code_block.take() {
                Some(block) => push_code_block(lines, idx, author, &block, width),
                None => code_block = Some(Vec::new()),
            }
            continue;
        }
        if let Some(block) = code_block.as_mut() {
            block.push(paragraph);
            continue;
        }
        for text in wrap_words(paragraph, width) {
            lines.push(DisplayLine {
                text,
                author: Some(author),
                source: idx,
                code: None,
            });
        }
    }
    // Unterminated fence: the rest of the message is still code.
    if let Some(block) = code_block {
        push_code_block(lines, idx, author, &block, width);
    }

    if lines.len() == start {
        lines.push(DisplayLine {
            text: String::new(),
            author: Some(author),
            source: idx,
            code: None,
        });
    }
}

fn push_code_block(
    lines: &mut Vec<DisplayLine>,
    idx: usize,
    author: Author,
    block: &[&str],
    width: usize,
) {
    let inner_width = width.saturating_sub(CODE_FRAME_WIDTH).max(1);
    let rows: Vec<(String, CodeRow)> = block
        .iter()
        .flat_map(|line| {
            hard_wrap(line, inner_width)
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| {
                    let code = CodeRow {
                        content_len: chunk.chars().count(),
                        continues: i > 0,
                    };
                    (chunk, code)
                })
        })
        .collect();
    let block_width = rows
        .iter()
        .map(|(_, code)| code.content_len)
        .max()
        .unwrap_or(0);

    for (row, code) in rows {
        lines.push(DisplayLine {
            text: format!(
                "{CODE_BORDER_LEFT}{}{CODE_BORDER_RIGHT}",
                pad_to(&row, block_width)
            ),
            author: Some(author),
            source: idx,
            code: Some(code),
        });
    }
}

/// The code a framed row holds, without its frame or padding.
fn code_content(line: &DisplayLine) -> &str {
    let (_, inner, _) = split_code_frame(&line.text);
    match line.code {
        Some(code) => clip_chars(inner, code.content_len),
        None => inner,
    }
}

/// Split a framed code row into `(left border, inner text, right border)`.
pub(crate) fn split_code_frame(text: &str) -> (&str, &str, &str) {
    match text
        .strip_prefix(CODE_BORDER_LEFT)
        .and_then(|rest| rest.strip_suffix(CODE_BORDER_RIGHT))
    {
        Some(inner) => (CODE_BORDER_LEFT, inner, CODE_BORDER_RIGHT),
        None => ("", text, ""),
    }
}

/// Map a row inside the chat pane (0 is the top border) to an index into the
/// flattened lines. Border rows and rows past the content are `None`.
pub(crate) fn line_index_for_row(
    row_in_pane: u16,
    offset: usize,
    visible_rows: usize,
    total_lines: usize,
) -> Option<usize> {
    let row = row_in_pane as usize;
    if row == 0 || row > visible_rows {
        return None;
    }
    let index = row - 1 + offset;
    (index < total_lines).then_some(index)
}

/// Text a middle-click on `lines[index]` should copy: the whole code block
/// without framing for code rows, the original message otherwise.
pub(crate) fn copy_text_for_line(
    lines: &[DisplayLine],
    messages: &[Message],
    index: usize,
) -> Option<String> {
    let line = lines.get(index)?;
    if line.author.is_none() {
        return None;
    }
    if line.is_code() {
        return Some(block_text(lines, index));
    }
    messages.get(line.source).map(|m| m.text.clone())
}

/// Rebuild the source lines of the code block containing `lines[index]`.
/// Wrapped tails are glued back onto their line.
fn block_text(lines: &[DisplayLine], index: usize) -> String {
    let source = lines[index].source;
    let in_block = |l: &DisplayLine| l.is_code() && l.source == source;

    let mut start = index;
    while start > 0 && in_block(&lines[start - 1]) {
        start -= 1;
    }
    let mut text = String::new();
    let rows = lines[start..].iter().take_while(|l| in_block(*l));
    for (i, line) in rows.enumerate() {
        let continues = line.code.is_some_and(|c| c.continues);
        if i > 0 && !continues {
            text.push('\n');
        }
        text.push_str(code_content(line));
    }
    text
}

/// Flatten the tool-call history into sidebar rows: a command row, its output
/// padded to the full pane width, then one blank row.
pub(crate) fn flatten_tool_calls(calls: &[ToolCall], width: usize) -> Vec<SidebarLine> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for call in calls {
        let command = format!("{COMMAND_PREFIX}{}", call.command.replace('\n', " "));
        for text in hard_wrap(&command, width) {
            lines.push(SidebarLine {
                text,
                kind: SidebarLineKind::Command,
            });
        }
        let output = call.output.trim_end_matches('\n');
        if !output.is_empty() {
            for row in output.split('\n').flat_map(|l| hard_wrap(l, width)) {
                lines.push(SidebarLine {
                    text: pad_to(&row, width),
                    kind: SidebarLineKind::Output,
                });
            }
        }
        lines.push(SidebarLine {
            text: String::new(),
            kind: SidebarLineKind::Blank,
        });
    }
    lines
}
