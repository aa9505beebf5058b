//! Single-line text input used by the shell prompt and the search box

/// Editable line with a byte-offset cursor that always sits on a char boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    buffer: String,
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input holding `value`, cursor at the end
    pub fn with_value(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Insert a character at the cursor
    pub fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text verbatim at the cursor (newlines included)
    pub fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Remove the character before the cursor
    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.buffer.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.after_cursor().chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Return the current line and reset the input
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    pub fn before_cursor(&self) -> &str {
        &self.buffer[..self.cursor]
    }

    pub fn after_cursor(&self) -> &str {
        &self.buffer[self.cursor..]
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.before_cursor()
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_empty() {
        let input = TextInputState::new();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_insert_at_end() {
        let mut input = TextInputState::with_value("echo h");
        input.insert('i');
        assert_eq!(input.value(), "echo hi");
        assert_eq!(input.cursor(), 7);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = TextInputState::with_value("ecoh");
        input.move_left();
        input.move_left();
        input.insert('h');
        assert_eq!(input.value(), "echoh");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_insert_str_keeps_newlines() {
        let mut input = TextInputState::with_value("ls");
        input.insert_str(" -la\npwd");
        assert_eq!(input.value(), "ls -la\npwd");
        assert_eq!(input.cursor(), input.value().len());
    }

    #[test]
    fn test_backspace() {
        let mut input = TextInputState::with_value("web");
        input.backspace();
        assert_eq!(input.value(), "we");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_backspace_at_start() {
        let mut input = TextInputState::with_value("web");
        input.home();
        input.backspace();
        assert_eq!(input.value(), "web");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_move_right_at_end() {
        let mut input = TextInputState::with_value("web");
        input.move_right();
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_home_end() {
        let mut input = TextInputState::with_value("web");
        input.home();
        assert_eq!(input.cursor(), 0);
        input.end();
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_before_after_cursor() {
        let mut input = TextInputState::with_value("hello");
        input.move_left();
        input.move_left();
        assert_eq!(input.before_cursor(), "hel");
        assert_eq!(input.after_cursor(), "lo");
    }

    #[test]
    fn test_take_resets() {
        let mut input = TextInputState::with_value("uname -a");
        assert_eq!(input.take(), "uname -a");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut input = TextInputState::with_value("caf");
        input.insert('\u{00e9}');
        assert_eq!(input.value(), "café");
        input.move_left();
        assert_eq!(input.before_cursor(), "caf");
        input.move_right();
        input.backspace();
        assert_eq!(input.value(), "caf");
    }
}
