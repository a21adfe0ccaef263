use ratatui::layout::Rect;
use tracing::debug;

use super::text::wrap_input;
use crate::config::SidebarMode;

pub(crate) const SIDEBAR_MIN_WIDTH: u16 = 20;
/// Columns taken by a pane's left and right border.
pub(crate) const BORDER: u16 = 2;
pub(crate) const INPUT_PREFIX: &str = "> ";
pub(crate) const INPUT_CONTINUATION: &str = "  ";
pub(crate) const INPUT_PREFIX_WIDTH: u16 = 2;
/// Blank columns kept between a chat bubble and the pane border.
pub(crate) const CHAT_MARGIN: u16 = 1;
const MIN_INPUT_HEIGHT: u16 = 1 + BORDER;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Geometry {
    pub(crate) chat: Rect,
    pub(crate) sidebar: Rect,
    pub(crate) input: Rect,
    pub(crate) debug: Rect,
}

impl Geometry {
    /// Columns available to chat text once borders and bubble margins are removed.
    pub(crate) fn chat_text_width(&self) -> usize {
        self.chat
            .width
            .saturating_sub(BORDER + 2 * CHAT_MARGIN)
            .max(1) as usize
    }

    pub(crate) fn chat_rows(&self) -> usize {
        self.chat.height.saturating_sub(BORDER) as usize
    }

    pub(crate) fn sidebar_text_width(&self) -> usize {
        self.sidebar.width.saturating_sub(BORDER).max(1) as usize
    }

    pub(crate) fn sidebar_rows(&self) -> usize {
        self.sidebar.height.saturating_sub(BORDER) as usize
    }

    pub(crate) fn input_text_width(&self) -> usize {
        input_text_width(self.input.width)
    }

    pub(crate) fn input_rows(&self) -> usize {
        self.input.height.saturating_sub(BORDER) as usize
    }
}

fn input_text_width(input_pane_width: u16) -> usize {
    input_pane_width
        .saturating_sub(BORDER + INPUT_PREFIX_WIDTH)
        .max(1) as usize
}

pub(crate) fn sidebar_width(terminal_width: u16) -> u16 {
    SIDEBAR_MIN_WIDTH
        .max(terminal_width / 4)
        .min(terminal_width)
}

/// Pane rectangles for a terminal of `height` x `width` holding `input`.
///
/// The input pane grows with the wrapped input but always leaves at least
/// one row for the chat pane. On terminals smaller than the floors the panes
/// are clamped to their minimum sizes rather than rejected.
pub(crate) fn compute_geometry(
    height: u16,
    width: u16,
    input: &str,
    sidebar_mode: SidebarMode,
) -> Geometry {
    let sidebar_w = sidebar_width(width);
    let chat_w = width.saturating_sub(sidebar_w);
    let input_w = match sidebar_mode {
        SidebarMode::FullHeight => chat_w,
        SidebarMode::ChatHeight => width,
    };

    let wrapped = wrap_input(input, input_text_width(input_w)).len();
    let wrapped = u16::try_from(wrapped).unwrap_or(u16::MAX);
    let input_h = wrapped
        .saturating_add(BORDER)
        .min(height.saturating_sub(3))
        .max(MIN_INPUT_HEIGHT);
    let chat_h = height.saturating_sub(input_h);

    let sidebar_h = match sidebar_mode {
        SidebarMode::FullHeight => height,
        SidebarMode::ChatHeight => chat_h,
    };

    Geometry {
        chat: Rect::new(0, 0, chat_w, chat_h),
        sidebar: Rect::new(chat_w, 0, sidebar_w, sidebar_h),
        input: Rect::new(0, chat_h, input_w, input_h.min(height)),
        debug: Rect::new(0, 0, width, height),
    }
}

/// Holds the geometry of the last frame and only recomputes the pane
/// rectangles when the terminal size or the required input height changes.
pub(crate) struct LayoutManager {
    sidebar_mode: SidebarMode,
    geometry: Geometry,
    size: (u16, u16),
}

impl LayoutManager {
    pub(crate) fn new(sidebar_mode: SidebarMode) -> Self {
        Self {
            sidebar_mode,
            geometry: Geometry::default(),
            size: (0, 0),
        }
    }

    pub(crate) fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Returns true when the pane rectangles moved or resized.
    pub(crate) fn update(&mut self, height: u16, width: u16, input: &str) -> bool {
        let next = compute_geometry(height, width, input, self.sidebar_mode);
        if self.size == (height, width) && next.input.height == self.geometry.input.height {
            return false;
        }
        debug!(
            height,
            width,
            input_height = next.input.height,
            "pane layout changed"
        );
        self.size = (height, width);
        self.geometry = next;
        true
    }
}
