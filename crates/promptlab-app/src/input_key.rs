//! Keyboard input as seen by the reducer.
//!
//! The TUI converts crossterm events into `InputKey` at its boundary so the
//! app crate never depends on a terminal library.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character
    Char(char),
    /// Character with Ctrl held
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
}

impl InputKey {
    /// The character a text field should receive for this key, if any
    pub fn text(&self) -> Option<char> {
        match self {
            InputKey::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_ctrl(&self, c: char) -> bool {
        matches!(self, InputKey::CharCtrl(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// Apply a text-editing key to `value`, returning the edited copy.
///
/// Returns `None` when the key does not edit text. `multiline` lets Enter
/// insert a newline.
pub fn edit_text(value: &str, key: InputKey, multiline: bool) -> Option<String> {
    match key {
        InputKey::Char(c) => {
            let mut out = value.to_string();
            out.push(c);
            Some(out)
        }
        InputKey::Backspace => {
            let mut out = value.to_string();
            out.pop();
            Some(out)
        }
        InputKey::Enter if multiline => Some(format!("{value}\n")),
        InputKey::CharCtrl('u') => Some(String::new()),
        _ => None,
    }
}
