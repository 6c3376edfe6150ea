//! Footer row of key bindings for the current screen and focus

use promptlab_app::screens::{CompareFocus, DetailFocus, QuickTestFocus};
use promptlab_app::{AppState, UiMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::styles;

type Hint = (&'static str, &'static str);

/// Bindings worth advertising in the current state
pub fn hints_for(state: &AppState) -> Vec<Hint> {
    match state.ui_mode {
        UiMode::PromptList => vec![
            ("↑↓", "Move"),
            ("Enter", "Open"),
            ("n", "New"),
            ("t", "Quick test"),
            ("r", "Refresh"),
            ("s", "API key"),
            ("q", "Quit"),
        ],
        UiMode::Detail => match state.detail.focus {
            DetailFocus::Versions => vec![
                ("↑↓", "Version"),
                ("r", "Run"),
                ("s", "Save"),
                ("c", "Compare"),
                ("e", "Export"),
                ("p", "Provider"),
                ("Tab", "Focus"),
                ("Esc", "Back"),
            ],
            DetailFocus::Draft => vec![
                ("^S", "Save version"),
                ("^R", "Run"),
                ("Tab", "Focus"),
                ("Esc", "Back"),
            ],
            DetailFocus::Inputs => vec![
                ("↑↓", "Input"),
                ("Enter", "Add"),
                ("^D", "Remove"),
                ("^R", "Run"),
                ("Tab", "Focus"),
            ],
            DetailFocus::Model => vec![("^P", "Provider"), ("^R", "Run"), ("Tab", "Focus")],
        },
        UiMode::Compare => match state.compare.focus {
            CompareFocus::Input => vec![("Enter", "Run"), ("Tab", "Focus"), ("Esc", "Back")],
            CompareFocus::SlotA | CompareFocus::SlotB => vec![
                ("←→", "Version"),
                ("Enter", "Run"),
                ("Tab", "Focus"),
                ("Esc", "Back"),
            ],
        },
        UiMode::QuickTest => {
            let mut hints = vec![("^R", "Run"), ("^P", "Provider")];
            match state.quick_test.focus {
                QuickTestFocus::Inputs => {
                    hints.extend([("Enter", "Add input"), ("^D", "Remove")]);
                }
                QuickTestFocus::History => hints.push(("Enter", "Load")),
                QuickTestFocus::Content | QuickTestFocus::Model => {}
            }
            hints.extend([("Tab", "Focus"), ("Esc", "Back")]);
            hints
        }
        UiMode::CreatePrompt => vec![
            ("^S", "Create"),
            ("Tab", "Next field"),
            ("Esc", "Cancel"),
        ],
        UiMode::Settings => vec![
            ("Enter", "Save"),
            ("^V", "Reveal"),
            ("^D", "Remove key"),
            ("Esc", "Back"),
        ],
    }
}

pub struct KeyHints {
    hints: Vec<Hint>,
}

impl KeyHints {
    pub fn new(hints: Vec<Hint>) -> Self {
        Self { hints }
    }
}

impl Widget for KeyHints {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in self.hints {
            spans.push(Span::styled("[", styles::text_muted()));
            spans.push(Span::styled(key, styles::keybinding()));
            spans.push(Span::styled(format!("] {label}  "), styles::text_muted()));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_hints_follow_detail_focus() {
        let mut state = AppState::new();
        state.ui_mode = UiMode::Detail;
        assert!(hints_for(&state).contains(&("c", "Compare")));

        state.detail.focus = DetailFocus::Draft;
        let hints = hints_for(&state);
        assert!(hints.contains(&("^S", "Save version")));
        assert!(!hints.contains(&("c", "Compare")));
    }

    #[test]
    fn test_quick_test_history_hint() {
        let mut state = AppState::new();
        state.ui_mode = UiMode::QuickTest;
        state.quick_test.focus = QuickTestFocus::History;
        assert!(hints_for(&state).contains(&("Enter", "Load")));
    }

    #[test]
    fn test_key_hints_render() {
        let mut term = TestTerminal::with_size(80, 1);
        let state = AppState::new();
        term.render_widget(KeyHints::new(hints_for(&state)), term.area());

        assert!(term.buffer_contains("[Enter] Open"));
        assert!(term.buffer_contains("[q] Quit"));
    }
}
