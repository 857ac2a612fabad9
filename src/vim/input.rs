use zeroize::Zeroize;

/// Single-line text buffer with a character cursor.
///
/// Buffers can be limited to a maximum length and to ASCII digits. Content is
/// wiped on clear and on drop since it holds personal data.
#[derive(Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
    max_len: Option<usize>,
    digits_only: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digits only, at most `max_len` characters.
    pub fn numeric(max_len: Option<usize>) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            max_len,
            digits_only: true,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    pub fn is_full(&self) -> bool {
        self.max_len.is_some_and(|max| self.len() >= max)
    }

    /// Insert at the cursor. Returns false if the character was rejected.
    pub fn insert(&mut self, c: char) -> bool {
        if c.is_control() || self.is_full() || (self.digits_only && !c.is_ascii_digit()) {
            return false;
        }
        let byte_pos = self.cursor_byte_position();
        self.content.insert(byte_pos, c);
        self.cursor += 1;
        true
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.remove_at_cursor();
            true
        } else {
            false
        }
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor < self.len() {
            self.remove_at_cursor();
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.content.zeroize();
        self.cursor = 0;
    }

    /// Replace the content, applying the same filters as typing.
    pub fn set(&mut self, value: &str) {
        self.clear();
        for c in value.chars() {
            self.insert(c);
        }
    }

    fn remove_at_cursor(&mut self) {
        let byte_pos = self.cursor_byte_position();
        let next_byte_pos = self.content[byte_pos..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| byte_pos + i)
            .unwrap_or(self.content.len());
        self.content.drain(byte_pos..next_byte_pos);
    }

    fn cursor_byte_position(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }
}

impl Drop for InputBuffer {
    fn drop(&mut self) {
        self.content.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_at_cursor() {
        let mut buf = InputBuffer::new();
        buf.set("Jo");
        buf.move_start();
        buf.insert('X');
        assert_eq!(buf.content(), "XJo");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn numeric_rejects_letters_and_respects_limit() {
        let mut buf = InputBuffer::numeric(Some(2));
        assert!(!buf.insert('a'));
        assert!(buf.insert('0'));
        assert!(buf.insert('1'));
        assert!(!buf.insert('2'));
        assert_eq!(buf.content(), "01");
        assert!(buf.is_full());
    }

    #[test]
    fn set_applies_filters() {
        let mut buf = InputBuffer::numeric(Some(4));
        buf.set("19a905");
        assert_eq!(buf.content(), "1990");
    }

    #[test]
    fn delete_handles_multibyte_characters() {
        let mut buf = InputBuffer::new();
        buf.set("Zoë");
        assert!(buf.delete_back());
        assert_eq!(buf.content(), "Zo");
        buf.move_start();
        assert!(buf.delete_forward());
        assert_eq!(buf.content(), "o");
    }

    #[test]
    fn clear_resets_cursor() {
        let mut buf = InputBuffer::new().with_max_len(8);
        buf.set("Ng");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.max_len(), Some(8));
    }
}
