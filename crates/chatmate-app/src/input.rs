//! Terminal-agnostic keyboard input and line editing.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Tab key (cycle panes or form fields).
    Tab,
    /// Escape key (leave the field being edited).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
    /// Ctrl-C. Quits from anywhere, including inside a field.
    Interrupt,
}

/// Cursor over a text field owned elsewhere.
///
/// The text itself lives in the state machine that owns the draft (session
/// input, rename draft, document title, ...), so it can be cleared or
/// replaced by a completion at any time. The cursor counts characters, not
/// bytes, and is clamped to the current text on every edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineEditor {
    cursor: usize,
}

impl LineEditor {
    /// Editor with the cursor at the end of `text`.
    pub fn at_end(text: &str) -> Self {
        Self { cursor: text.chars().count() }
    }

    /// Cursor position in characters, clamped to `text`.
    pub fn cursor(&self, text: &str) -> usize {
        self.cursor.min(text.chars().count())
    }

    /// Apply an editing key to `text`.
    ///
    /// Returns `false` for keys that are not editing keys (Enter, Tab, Esc,
    /// Up, Down, Interrupt), leaving `text` untouched.
    pub fn apply(&mut self, key: KeyInput, text: &mut String) -> bool {
        let len = text.chars().count();
        self.cursor = self.cursor.min(len);

        match key {
            KeyInput::Char(c) => {
                text.insert(byte_index(text, self.cursor), c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    text.remove(byte_index(text, self.cursor));
                }
            },
            KeyInput::Delete => {
                if self.cursor < len {
                    text.remove(byte_index(text, self.cursor));
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = self.cursor.saturating_add(1).min(len),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = len,
            KeyInput::Enter
            | KeyInput::Tab
            | KeyInput::Esc
            | KeyInput::Up
            | KeyInput::Down
            | KeyInput::Interrupt => {
                return false;
            },
        }
        true
    }
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}
