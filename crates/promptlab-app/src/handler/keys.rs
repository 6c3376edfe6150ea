//! Key event handlers for different UI modes

use promptlab_core::Field;

use crate::input_key::{edit_text, InputKey};
use crate::message::Message;
use crate::screens::{CompareFocus, CompareSlot, DetailFocus, QuickTestFocus};
use crate::state::{AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit from anywhere
    if key.is_ctrl('c') {
        return Some(Message::Quit);
    }

    match state.ui_mode {
        UiMode::PromptList => handle_key_list(key),
        UiMode::Detail => handle_key_detail(state, key),
        UiMode::Compare => handle_key_compare(state, key),
        UiMode::QuickTest => handle_key_quick_test(state, key),
        UiMode::CreatePrompt => handle_key_create(state, key),
        UiMode::Settings => handle_key_settings(state, key),
    }
}

fn handle_key_list(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') | InputKey::Esc => Some(Message::Quit),
        InputKey::Up | InputKey::Char('k') => Some(Message::ListPrevious),
        InputKey::Down | InputKey::Char('j') => Some(Message::ListNext),
        InputKey::Enter => Some(Message::OpenSelectedPrompt),
        InputKey::Char('r') => Some(Message::RefreshPrompts),
        InputKey::Char('n') => Some(Message::OpenCreatePrompt),
        InputKey::Char('t') => Some(Message::OpenQuickTest),
        InputKey::Char('s') => Some(Message::OpenSettings),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Detail
// ─────────────────────────────────────────────────────────────────────────────

fn handle_key_detail(state: &AppState, key: InputKey) -> Option<Message> {
    let detail = &state.detail;

    // Bindings that work regardless of focus
    match key {
        InputKey::Esc => return Some(Message::Back),
        InputKey::Tab => return Some(Message::FocusNext),
        InputKey::BackTab => return Some(Message::FocusPrevious),
        InputKey::CharCtrl('r') => return Some(Message::RunTest),
        InputKey::CharCtrl('s') => return Some(Message::SaveVersion),
        InputKey::CharCtrl('e') => return Some(Message::ExportResults(None)),
        InputKey::CharCtrl('o') => return detail.prompt_id.map(Message::OpenCompare),
        InputKey::CharCtrl('p') => return Some(Message::SetProvider(detail.provider.next())),
        InputKey::CharCtrl('n') => return Some(Message::AddTestInput),
        InputKey::CharCtrl('d') => return Some(Message::RemoveTestInput(detail.input_cursor)),
        _ => {}
    }

    match detail.focus {
        DetailFocus::Versions => match key {
            InputKey::Up | InputKey::Char('k') => Some(Message::SelectPreviousVersion),
            InputKey::Down | InputKey::Char('j') => Some(Message::SelectNextVersion),
            InputKey::Char('r') => Some(Message::RunTest),
            InputKey::Char('s') => Some(Message::SaveVersion),
            InputKey::Char('e') => Some(Message::ExportResults(None)),
            InputKey::Char('c') => detail.prompt_id.map(Message::OpenCompare),
            InputKey::Char('p') => Some(Message::SetProvider(detail.provider.next())),
            InputKey::Char('q') => Some(Message::Back),
            InputKey::Enter => Some(Message::FocusNext),
            _ => None,
        },
        DetailFocus::Draft => edit_text(&detail.draft, key, true).map(Message::EditDraft),
        DetailFocus::Inputs => match key {
            InputKey::Up => Some(Message::CursorUp),
            InputKey::Down => Some(Message::CursorDown),
            InputKey::Enter => Some(Message::AddTestInput),
            _ => {
                let index = detail.input_cursor;
                let current = detail
                    .test_inputs
                    .get(index)
                    .map(|i| i.question.as_str())
                    .unwrap_or_default();
                edit_text(current, key, false).map(|value| Message::EditTestInput { index, value })
            }
        },
        DetailFocus::Model => edit_text(&detail.model, key, false).map(Message::SetModel),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compare
// ─────────────────────────────────────────────────────────────────────────────

fn handle_key_compare(state: &AppState, key: InputKey) -> Option<Message> {
    let compare = &state.compare;
    match key {
        InputKey::Esc => return Some(Message::Back),
        InputKey::Tab => return Some(Message::FocusNext),
        InputKey::BackTab => return Some(Message::FocusPrevious),
        InputKey::CharCtrl('r') => return Some(Message::RunComparison),
        _ => {}
    }

    let slot = match compare.focus {
        CompareFocus::SlotA => CompareSlot::A,
        CompareFocus::SlotB => CompareSlot::B,
        CompareFocus::Input => {
            return match key {
                InputKey::Enter => Some(Message::RunComparison),
                _ => edit_text(&compare.input, key, false).map(Message::EditCompareInput),
            };
        }
    };

    match key {
        InputKey::Left | InputKey::Up | InputKey::Char('h' | 'k') => {
            Some(Message::CycleCompareSlot {
                slot,
                forward: false,
            })
        }
        InputKey::Right | InputKey::Down | InputKey::Char('l' | 'j') => {
            Some(Message::CycleCompareSlot {
                slot,
                forward: true,
            })
        }
        InputKey::Enter => Some(Message::RunComparison),
        InputKey::Char('q') => Some(Message::Back),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quick test
// ─────────────────────────────────────────────────────────────────────────────

fn handle_key_quick_test(state: &AppState, key: InputKey) -> Option<Message> {
    let quick = &state.quick_test;
    match key {
        InputKey::Esc => return Some(Message::Back),
        InputKey::Tab => return Some(Message::FocusNext),
        InputKey::BackTab => return Some(Message::FocusPrevious),
        InputKey::CharCtrl('r') => return Some(Message::RunQuickTest),
        InputKey::CharCtrl('p') => return Some(Message::SetQuickProvider(quick.provider.next())),
        InputKey::CharCtrl('n') => return Some(Message::AddQuickInput),
        InputKey::CharCtrl('d') => return Some(Message::RemoveQuickInput(quick.input_cursor)),
        _ => {}
    }

    match quick.focus {
        QuickTestFocus::Content => {
            edit_text(&quick.content, key, true).map(Message::EditQuickContent)
        }
        QuickTestFocus::Inputs => match key {
            InputKey::Up => Some(Message::CursorUp),
            InputKey::Down => Some(Message::CursorDown),
            InputKey::Enter => Some(Message::AddQuickInput),
            _ => {
                let index = quick.input_cursor;
                let current = quick
                    .inputs
                    .get(index)
                    .map(|i| i.question.as_str())
                    .unwrap_or_default();
                edit_text(current, key, false)
                    .map(|value| Message::EditQuickInput { index, value })
            }
        },
        QuickTestFocus::Model => edit_text(&quick.model, key, false).map(Message::SetQuickModel),
        QuickTestFocus::History => match key {
            InputKey::Up | InputKey::Char('k') => Some(Message::CursorUp),
            InputKey::Down | InputKey::Char('j') => Some(Message::CursorDown),
            InputKey::Enter => Some(Message::LoadQuickHistory(quick.history_cursor)),
            _ => None,
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Create prompt
// ─────────────────────────────────────────────────────────────────────────────

fn handle_key_create(state: &AppState, key: InputKey) -> Option<Message> {
    let create = &state.create;
    match key {
        InputKey::Esc => Some(Message::Back),
        InputKey::Tab => Some(Message::FocusNext),
        InputKey::BackTab => Some(Message::FocusPrevious),
        InputKey::CharCtrl('s') => Some(Message::SubmitCreatePrompt),
        InputKey::Enter if create.focus != Field::InitialContent => Some(Message::FocusNext),
        _ => {
            let field = create.focus;
            let multiline = field == Field::InitialContent;
            edit_text(create.value(field), key, multiline)
                .map(|value| Message::EditCreateField { field, value })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

fn handle_key_settings(state: &AppState, key: InputKey) -> Option<Message> {
    let screen = &state.settings_screen;
    match key {
        InputKey::Esc => Some(Message::Back),
        InputKey::Enter => Some(Message::SaveApiKey),
        InputKey::CharCtrl('d') => Some(Message::ClearApiKey),
        InputKey::CharCtrl('v') => Some(Message::ToggleRevealApiKey),
        _ if screen.loading => None,
        _ => edit_text(&screen.api_key, key, false).map(Message::EditApiKey),
    }
}
