use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Author {
    Human,
    Ai,
}

/// One chat message. Never edited once it is in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Message {
    pub(crate) text: String,
    pub(crate) author: Author,
}

/// A single row of the chat pane, derived from the message store every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DisplayLine {
    pub(crate) text: String,
    /// `None` marks the blank separator between bubbles.
    pub(crate) author: Option<Author>,
    pub(crate) source: usize,
    pub(crate) code: Option<CodeRow>,
}

/// Where a framed code row came from inside its block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CodeRow {
    /// Characters of real content; the rest up to the right border is padding.
    pub(crate) content_len: usize,
    /// The row is a wrapped tail of the source line above it.
    pub(crate) continues: bool,
}

impl DisplayLine {
    pub(crate) fn separator(source: usize) -> Self {
        Self {
            text: String::new(),
            author: None,
            source,
            code: None,
        }
    }

    pub(crate) fn is_code(&self) -> bool {
        self.code.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ToolCall {
    pub(crate) command: String,
    pub(crate) output: String,
}

/// The `{command: output}` mapping the agent produced for one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ToolCallRecord {
    pub(crate) calls: Vec<ToolCall>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ToolCalls {
    Single(ToolCallRecord),
    Many(Vec<ToolCallRecord>),
}

impl ToolCalls {
    pub(crate) fn empty() -> Self {
        ToolCalls::Many(Vec::new())
    }

    pub(crate) fn into_calls(self) -> Vec<ToolCall> {
        match self {
            ToolCalls::Single(record) => record.calls,
            ToolCalls::Many(records) => records.into_iter().flat_map(|r| r.calls).collect(),
        }
    }
}

/// Payload of the agent→view channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AgentReply {
    pub(crate) tool_calls: ToolCalls,
    pub(crate) text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SidebarLineKind {
    Command,
    Output,
    Blank,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SidebarLine {
    pub(crate) text: String,
    pub(crate) kind: SidebarLineKind,
}

pub(crate) fn default_palette() -> ThemePalette {
    ThemePalette {
        prompt: Color::Rgb(100, 150, 200),
        input_text: Color::Rgb(180, 200, 220),
        muted_text: Color::Rgb(80, 100, 120),
        border: Color::Rgb(60, 80, 100),
        title: Color::Rgb(150, 170, 190),
        status_text: Color::Rgb(200, 170, 110),
        human_fg: Color::Rgb(200, 220, 240),
        ai_fg: Color::Rgb(170, 190, 210),
        code_fg: Color::Rgb(180, 200, 220),
        code_bg: Color::Rgb(5, 15, 25),
        command_fg: Color::Rgb(130, 200, 160),
        output_fg: Color::Rgb(160, 170, 180),
        output_bg: Color::Rgb(20, 30, 40),
    }
}

#[derive(Clone, Copy)]
pub(crate) struct ThemePalette {
    pub(crate) prompt: Color,
    pub(crate) input_text: Color,
    pub(crate) muted_text: Color,
    pub(crate) border: Color,
    pub(crate) title: Color,
    pub(crate) status_text: Color,
    pub(crate) human_fg: Color,
    pub(crate) ai_fg: Color,
    pub(crate) code_fg: Color,
    pub(crate) code_bg: Color,
    pub(crate) command_fg: Color,
    pub(crate) output_fg: Color,
    pub(crate) output_bg: Color,
}

impl ThemePalette {
    pub(crate) fn prompt_style(self) -> Style {
        Style::default()
            .fg(self.prompt)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn title_style(self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn border_style(self) -> Style {
        Style::default().fg(self.border)
    }

    pub(crate) fn muted_style(self) -> Style {
        Style::default().fg(self.muted_text)
    }

    pub(crate) fn status_style(self) -> Style {
        Style::default()
            .fg(self.status_text)
            .add_modifier(Modifier::ITALIC)
    }

    pub(crate) fn input_style(self) -> Style {
        Style::default().fg(self.input_text)
    }

    pub(crate) fn author_style(self, author: Author) -> Style {
        match author {
            Author::Human => Style::default()
                .fg(self.human_fg)
                .add_modifier(Modifier::BOLD),
            Author::Ai => Style::default().fg(self.ai_fg),
        }
    }

    pub(crate) fn code_style(self) -> Style {
        Style::default().fg(self.code_fg).bg(self.code_bg)
    }

    pub(crate) fn command_style(self) -> Style {
        Style::default()
            .fg(self.command_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn output_style(self) -> Style {
        Style::default().fg(self.output_fg).bg(self.output_bg)
    }
}
