const TAB_STOP: &str = "    ";

/// Strip ANSI escapes and control characters from agent-produced text so it
/// cannot move the cursor or recolor the screen. Tabs become spaces since the
/// panes count one column per character.
pub(super) fn sanitize_runtime_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_escape = false;
    let mut in_csi = false;

    for ch in text.chars() {
        if in_escape {
            if in_csi {
                // CSI sequence terminates at bytes in range 0x40..0x7E.
                if ('@'..='~').contains(&ch) {
                    in_escape = false;
                    in_csi = false;
                }
                continue;
            }
            if ch == '[' {
                in_csi = true;
                continue;
            }
            in_escape = false;
            continue;
        }

        if ch == '\u{1b}' {
            in_escape = true;
            continue;
        }

        if ch == '\r' {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            continue;
        }

        if ch == '\t' {
            out.push_str(TAB_STOP);
            continue;
        }

        if ch.is_control() && ch != '\n' {
            continue;
        }

        out.push(ch);
    }

    out
}

/// Greedy word wrap. Breaks only at whitespace unless a single word is wider
/// than `width`, in which case the word is split into `width`-sized chunks.
/// Always returns at least one line.
pub(crate) fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        while word_len > width {
            let split = byte_offset_of_char(word, width);
            lines.push(word[..split].to_string());
            word = &word[split..];
            word_len -= width;
        }
        current.push_str(word);
        current_len = word_len;
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split into `width`-sized chunks without regard for word boundaries.
/// Leading whitespace survives, which matters for code and command output.
pub(crate) fn hard_wrap(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Wrap the input buffer the way the input pane shows it: each embedded
/// newline starts a new row and long rows are hard-wrapped.
pub(crate) fn wrap_input(input: &str, width: usize) -> Vec<String> {
    input
        .split('\n')
        .flat_map(|part| hard_wrap(part, width))
        .collect()
}

pub(crate) fn pad_to(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + width - len);
    out.push_str(text);
    out.push_str(&" ".repeat(width - len));
    out
}

pub(crate) fn clip_chars(text: &str, width: usize) -> &str {
    &text[..byte_offset_of_char(text, width)]
}

fn byte_offset_of_char(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
