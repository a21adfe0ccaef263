pub(crate) const SCROLL_STEP: usize = 3;

pub(crate) fn max_offset(total_lines: usize, visible_rows: usize) -> usize {
    total_lines.saturating_sub(visible_rows)
}

pub(crate) fn clamp(offset: usize, total_lines: usize, visible_rows: usize) -> usize {
    offset.min(max_offset(total_lines, visible_rows))
}

pub(crate) fn is_at_bottom(offset: usize, total_lines: usize, visible_rows: usize) -> bool {
    offset >= max_offset(total_lines, visible_rows)
}

/// Scroll position of one pane.
///
/// `total` and `visible` are the dimensions seen at the last `sync`. While the
/// pane is pinned to the bottom, growth in `total` advances the offset with
/// it; once the user scrolls away the offset is only clamped.
#[derive(Clone, Debug)]
pub(crate) struct ScrollState {
    offset: usize,
    total: usize,
    visible: usize,
    pinned: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            total: 0,
            visible: 0,
            pinned: true,
        }
    }
}

impl ScrollState {
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn is_at_bottom(&self) -> bool {
        is_at_bottom(self.offset, self.total, self.visible)
    }

    /// Re-clamp against the current content size. Called once per render.
    /// A clamp that lands on the bottom (a resize, say) pins the pane again.
    pub(crate) fn sync(&mut self, total_lines: usize, visible_rows: usize) {
        self.total = total_lines;
        self.visible = visible_rows;
        if self.pinned {
            self.offset = max_offset(total_lines, visible_rows);
        } else {
            self.offset = clamp(self.offset, total_lines, visible_rows);
            self.pinned = is_at_bottom(self.offset, total_lines, visible_rows);
        }
    }

    pub(crate) fn scroll_up(&mut self, step: usize) {
        self.offset = clamp(self.offset.saturating_sub(step), self.total, self.visible);
        self.pinned = self.is_at_bottom();
    }

    pub(crate) fn scroll_down(&mut self, step: usize) {
        self.offset = clamp(self.offset.saturating_add(step), self.total, self.visible);
        self.pinned = self.is_at_bottom();
    }
}
