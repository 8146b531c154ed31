//! Raw input with a caret.
//!
//! Holds the keys typed so far (e.g. "nihao") before conversion. The caret is
//! a byte offset that always sits on a character boundary.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    caret: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position (byte offset).
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.caret = 0;
    }

    /// Take the whole input, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        self.caret = 0;
        std::mem::take(&mut self.text)
    }

    /// Insert a character at the caret and advance past it.
    pub fn insert(&mut self, ch: char) {
        self.text.insert(self.caret, ch);
        self.caret += ch.len_utf8();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.caret].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.caret..]
            .chars()
            .next()
            .map(|ch| self.caret + ch.len_utf8())
    }

    /// Remove the character before the caret (backspace).
    /// Returns true if a character was removed.
    pub fn delete_before(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.text.remove(prev);
                self.caret = prev;
                true
            }
            None => false,
        }
    }

    /// Remove the character after the caret (delete key).
    /// Returns true if a character was removed.
    pub fn delete_after(&mut self) -> bool {
        if self.caret < self.text.len() {
            self.text.remove(self.caret);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.caret = prev;
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.next_boundary() {
            Some(next) => {
                self.caret = next;
                true
            }
            None => false,
        }
    }

    pub fn move_to_start(&mut self) {
        self.caret = 0;
    }

    pub fn move_to_end(&mut self) {
        self.caret = self.text.len();
    }
}
