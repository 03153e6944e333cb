use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single line text field edited inside the terminal UI.
///
/// The cursor is a character index, so multi-byte input stays editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
    char_limit: usize,
    prompt: String,
    placeholder: String,
}

impl TextInput {
    pub fn new(prompt: &str, placeholder: &str, char_limit: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            char_limit,
            prompt: prompt.to_string(),
            placeholder: placeholder.to_string(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(offset, _)| offset)
    }

    /// Applies an editing key. Returns whether the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('u') if control => {
                let end = self.byte_offset(self.cursor);
                let changed = end > 0;
                self.value.replace_range(..end, "");
                self.cursor = 0;
                changed
            }
            KeyCode::Char('a') if control => {
                self.cursor = 0;
                false
            }
            KeyCode::Char('e') if control => {
                self.cursor = self.char_count();
                false
            }
            KeyCode::Char(_) if control => false,
            KeyCode::Char(c) => {
                if self.char_count() >= self.char_limit {
                    return false;
                }
                let offset = self.byte_offset(self.cursor);
                self.value.insert(offset, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let offset = self.byte_offset(self.cursor);
                self.value.remove(offset);
                true
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_count() {
                    return false;
                }
                let offset = self.byte_offset(self.cursor);
                self.value.remove(offset);
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.char_count();
                false
            }
            _ => false,
        }
    }
}
