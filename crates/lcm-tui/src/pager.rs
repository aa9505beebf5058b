//! Scrollable read-only text used by the Inspect and Logs views

/// Rows taken by the pane border and the footer line
pub const PAGER_CHROME: u16 = 3;

/// Number of text rows a pager shows on a terminal of `height` rows
pub fn viewport_rows(height: u16) -> usize {
    height.saturating_sub(PAGER_CHROME).max(1) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub title: String,
    pub lines: Vec<String>,
    /// Index of the first visible line
    pub scroll: usize,
}

impl Pager {
    /// Split `text` into lines, dropping trailing newlines
    pub fn new(title: impl Into<String>, text: &str) -> Self {
        Self {
            title: title.into(),
            lines: text
                .trim_end_matches('\n')
                .split('\n')
                .map(|l| l.trim_end_matches('\r').to_string())
                .collect(),
            scroll: 0,
        }
    }

    pub fn max_scroll(&self, viewport: usize) -> usize {
        self.lines.len().saturating_sub(viewport)
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize, viewport: usize) {
        self.scroll = (self.scroll + n).min(self.max_scroll(viewport));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_end(&mut self, viewport: usize) {
        self.scroll = self.max_scroll(viewport);
    }

    /// First and last visible line (1-based) for the position indicator
    pub fn position(&self, viewport: usize) -> (usize, usize) {
        let first = self.scroll.min(self.max_scroll(viewport));
        let last = (first + viewport).min(self.lines.len());
        (first + 1, last)
    }
}
