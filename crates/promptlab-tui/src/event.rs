//! Terminal event polling

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use promptlab_app::{InputKey, Message};
use promptlab_core::prelude::*;

/// Frame interval; a timeout produces a `Tick` that expires toasts
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Convert crossterm KeyEvent to InputKey
pub fn key_event_to_input(key: crossterm::event::KeyEvent) -> Option<InputKey> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputKey::CharCtrl(c.to_ascii_lowercase()))
        }
        KeyCode::Char(c) => Some(InputKey::Char(c)),
        KeyCode::Enter => Some(InputKey::Enter),
        KeyCode::Esc => Some(InputKey::Esc),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(InputKey::BackTab),
        KeyCode::Tab => Some(InputKey::Tab),
        KeyCode::BackTab => Some(InputKey::BackTab),
        KeyCode::Backspace => Some(InputKey::Backspace),
        KeyCode::Delete => Some(InputKey::Delete),
        KeyCode::Up => Some(InputKey::Up),
        KeyCode::Down => Some(InputKey::Down),
        KeyCode::Left => Some(InputKey::Left),
        KeyCode::Right => Some(InputKey::Right),
        KeyCode::Home => Some(InputKey::Home),
        KeyCode::End => Some(InputKey::End),
        KeyCode::PageUp => Some(InputKey::PageUp),
        KeyCode::PageDown => Some(InputKey::PageDown),
        _ => None,
    }
}

/// Poll for terminal events with timeout
pub fn poll() -> Result<Option<Message>> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(Some(Message::Tick));
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            Ok(key_event_to_input(key).map(Message::Key))
        }
        // A resize just needs a redraw, which the loop does every pass
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn convert(code: KeyCode, modifiers: KeyModifiers) -> Option<InputKey> {
        key_event_to_input(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_char_conversion() {
        assert_eq!(
            convert(KeyCode::Char('a'), KeyModifiers::NONE),
            Some(InputKey::Char('a'))
        );
    }

    #[test]
    fn test_ctrl_chars_are_normalised_to_lowercase() {
        assert_eq!(
            convert(KeyCode::Char('r'), KeyModifiers::CONTROL),
            Some(InputKey::CharCtrl('r'))
        );
        assert_eq!(
            convert(KeyCode::Char('S'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
            Some(InputKey::CharCtrl('s'))
        );
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(convert(KeyCode::Up, KeyModifiers::NONE), Some(InputKey::Up));
        assert_eq!(convert(KeyCode::Down, KeyModifiers::NONE), Some(InputKey::Down));
        assert_eq!(convert(KeyCode::Left, KeyModifiers::NONE), Some(InputKey::Left));
        assert_eq!(convert(KeyCode::Right, KeyModifiers::NONE), Some(InputKey::Right));
        assert_eq!(convert(KeyCode::PageDown, KeyModifiers::NONE), Some(InputKey::PageDown));
    }

    #[test]
    fn test_shift_tab_is_backtab() {
        assert_eq!(
            convert(KeyCode::Tab, KeyModifiers::SHIFT),
            Some(InputKey::BackTab)
        );
        assert_eq!(
            convert(KeyCode::BackTab, KeyModifiers::SHIFT),
            Some(InputKey::BackTab)
        );
        assert_eq!(convert(KeyCode::Tab, KeyModifiers::NONE), Some(InputKey::Tab));
    }

    #[test]
    fn test_unsupported_keys_are_ignored() {
        assert_eq!(convert(KeyCode::F(5), KeyModifiers::NONE), None);
        assert_eq!(convert(KeyCode::Insert, KeyModifiers::NONE), None);
    }
}
