//! Main update function - handles state transitions (TEA pattern)
//!
//! Screen handlers live in sibling modules:
//! - `list`: prompt list
//! - `detail`: versions, draft, test runs, history and export
//! - `compare`: side-by-side comparison
//! - `quick_test`: ad-hoc playground
//! - `create`: new prompt form
//! - `settings`: API key

use std::time::Instant;

use crate::message::{Message, PromptTarget};
use crate::screens::QuickTestFocus;
use crate::state::{AppState, UiMode};

use super::{
    compare, create, detail, keys::handle_key, list, quick_test, settings, UpdateResult,
};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        Message::Tick => {
            state.notifications.prune(Instant::now());
            UpdateResult::none()
        }

        Message::Quit => {
            state.quit();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::ShowPromptList => list::handle_show(state),
        Message::OpenPrompt(id) => detail::handle_open(state, id),
        Message::OpenCompare(id) => compare::handle_open(state, id),
        Message::OpenQuickTest => quick_test::handle_open(state),
        Message::OpenCreatePrompt => create::handle_open(state),
        Message::OpenSettings => settings::handle_open(state),
        Message::Back => handle_back(state),
        Message::FocusNext => handle_focus(state, true),
        Message::FocusPrevious => handle_focus(state, false),
        Message::CursorUp => handle_cursor(state, -1),
        Message::CursorDown => handle_cursor(state, 1),

        // ─────────────────────────────────────────────────────────
        // Prompt list
        // ─────────────────────────────────────────────────────────
        Message::RefreshPrompts => list::handle_refresh(state),
        Message::PromptsLoaded(prompts) => list::handle_loaded(state, prompts),
        Message::PromptsLoadFailed(error) => list::handle_load_failed(state, error),
        Message::ListNext => {
            state.prompt_list.select_next();
            UpdateResult::none()
        }
        Message::ListPrevious => {
            state.prompt_list.select_previous();
            UpdateResult::none()
        }
        Message::OpenSelectedPrompt => list::handle_open_selected(state),

        // ─────────────────────────────────────────────────────────
        // Prompt fetch
        // ─────────────────────────────────────────────────────────
        Message::PromptLoaded {
            target,
            generation,
            prompt,
        } => match target {
            PromptTarget::Detail => detail::handle_loaded(state, generation, prompt),
            PromptTarget::Compare => compare::handle_loaded(state, generation, prompt),
        },
        Message::PromptLoadFailed {
            target,
            generation,
            error,
        } => match target {
            PromptTarget::Detail => detail::handle_load_failed(state, generation, error),
            PromptTarget::Compare => compare::handle_load_failed(state, generation, error),
        },

        // ─────────────────────────────────────────────────────────
        // Detail
        // ─────────────────────────────────────────────────────────
        Message::SelectVersion(id) => detail::handle_select(state, id),
        Message::SelectNextVersion => detail::handle_select_neighbour(state, 1),
        Message::SelectPreviousVersion => detail::handle_select_neighbour(state, -1),
        Message::EditDraft(draft) => detail::handle_edit_draft(state, draft),
        Message::SaveVersion => detail::handle_save_version(state),
        Message::VersionSaved {
            prompt_id,
            mutation,
        } => detail::handle_version_saved(state, prompt_id, mutation),
        Message::VersionSaveFailed { prompt_id, error } => {
            detail::handle_version_save_failed(state, prompt_id, error)
        }
        Message::AddTestInput => detail::handle_add_input(state),
        Message::RemoveTestInput(index) => detail::handle_remove_input(state, index),
        Message::EditTestInput { index, value } => detail::handle_edit_input(state, index, value),
        Message::SetProvider(provider) => detail::handle_set_provider(state, provider),
        Message::SetModel(model) => detail::handle_set_model(state, model),
        Message::RunTest => detail::handle_run_test(state),
        Message::TestRunCompleted {
            sequence,
            version_id,
            run,
        } => detail::handle_test_completed(state, sequence, version_id, run),
        Message::TestRunFailed {
            sequence,
            version_id,
            error,
        } => detail::handle_test_failed(state, sequence, version_id, error),
        Message::HistoryLoaded { version_id, runs } => {
            detail::handle_history_loaded(state, version_id, runs)
        }
        Message::HistoryLoadFailed { version_id, error } => {
            detail::handle_history_failed(state, version_id, error)
        }
        Message::ExportResults(path) => detail::handle_export(state, path),
        Message::ExportCompleted(path) => detail::handle_export_completed(state, path),
        Message::ExportFailed(error) => detail::handle_export_failed(state, error),

        // ─────────────────────────────────────────────────────────
        // Comparator
        // ─────────────────────────────────────────────────────────
        Message::SetCompareSlot { slot, version_id } => {
            compare::handle_set_slot(state, slot, version_id)
        }
        Message::CycleCompareSlot { slot, forward } => {
            compare::handle_cycle_slot(state, slot, forward)
        }
        Message::EditCompareInput(input) => compare::handle_edit_input(state, input),
        Message::RunComparison => compare::handle_run(state),
        Message::ComparisonCompleted { sequence, a, b } => {
            compare::handle_completed(state, sequence, a, b)
        }
        Message::ComparisonFailed { sequence, error } => {
            compare::handle_failed(state, sequence, error)
        }

        // ─────────────────────────────────────────────────────────
        // Quick test
        // ─────────────────────────────────────────────────────────
        Message::EditQuickContent(content) => quick_test::handle_edit_content(state, content),
        Message::AddQuickInput => quick_test::handle_add_input(state),
        Message::RemoveQuickInput(index) => quick_test::handle_remove_input(state, index),
        Message::EditQuickInput { index, value } => {
            quick_test::handle_edit_input(state, index, value)
        }
        Message::SetQuickProvider(provider) => quick_test::handle_set_provider(state, provider),
        Message::SetQuickModel(model) => quick_test::handle_set_model(state, model),
        Message::RunQuickTest => quick_test::handle_run(state),
        Message::QuickTestCompleted(run) => quick_test::handle_completed(state, run),
        Message::QuickTestFailed(error) => quick_test::handle_failed(state, error),
        Message::LoadQuickHistory(index) => quick_test::handle_load_history(state, index),

        // ─────────────────────────────────────────────────────────
        // Create prompt
        // ─────────────────────────────────────────────────────────
        Message::EditCreateField { field, value } => create::handle_edit(state, field, value),
        Message::SubmitCreatePrompt => create::handle_submit(state),
        Message::PromptCreated(prompt) => create::handle_created(state, prompt),
        Message::PromptCreateFailed(error) => create::handle_failed(state, error),

        // ─────────────────────────────────────────────────────────
        // API key
        // ─────────────────────────────────────────────────────────
        Message::ApiKeyLoaded(key) => settings::handle_loaded(state, key),
        Message::ApiKeyLoadFailed(error) => settings::handle_load_failed(state, error),
        Message::EditApiKey(value) => settings::handle_edit(state, value),
        Message::ToggleRevealApiKey => settings::handle_toggle_reveal(state),
        Message::SaveApiKey => settings::handle_save(state),
        Message::ClearApiKey => settings::handle_clear(state),
        Message::ApiKeySaved { stored } => settings::handle_saved(state, stored),
        Message::ApiKeySaveFailed(error) => settings::handle_save_failed(state, error),
    }
}

fn handle_back(state: &mut AppState) -> UpdateResult {
    match state.ui_mode {
        UiMode::PromptList => UpdateResult::none(),
        UiMode::Compare if state.detail.prompt_id == state.compare.prompt_id => {
            state.ui_mode = UiMode::Detail;
            UpdateResult::none()
        }
        UiMode::Settings => {
            state.ui_mode = state.previous_mode;
            UpdateResult::none()
        }
        UiMode::Detail | UiMode::Compare | UiMode::QuickTest | UiMode::CreatePrompt => {
            UpdateResult::message(Message::ShowPromptList)
        }
    }
}

fn handle_focus(state: &mut AppState, forward: bool) -> UpdateResult {
    match state.ui_mode {
        UiMode::Detail => {
            let focus = state.detail.focus;
            state.detail.focus = if forward {
                focus.next()
            } else {
                focus.previous()
            };
        }
        UiMode::Compare => {
            // Three stops; stepping back is two steps forward
            let steps = if forward { 1 } else { 2 };
            for _ in 0..steps {
                state.compare.focus = state.compare.focus.next();
            }
        }
        UiMode::QuickTest => {
            let steps = if forward { 1 } else { 3 };
            for _ in 0..steps {
                state.quick_test.focus = state.quick_test.focus.next();
            }
        }
        UiMode::CreatePrompt => {
            if forward {
                state.create.focus_next();
            } else {
                state.create.focus_previous();
            }
        }
        UiMode::PromptList | UiMode::Settings => {}
    }
    UpdateResult::none()
}

fn handle_cursor(state: &mut AppState, delta: isize) -> UpdateResult {
    match state.ui_mode {
        UiMode::PromptList => {
            if delta > 0 {
                state.prompt_list.select_next();
            } else {
                state.prompt_list.select_previous();
            }
        }
        UiMode::Detail => {
            let len = state.detail.test_inputs.len();
            state.detail.input_cursor = step(state.detail.input_cursor, delta, len);
        }
        UiMode::QuickTest => {
            let quick = &mut state.quick_test;
            match quick.focus {
                QuickTestFocus::History => {
                    quick.history_cursor = step(quick.history_cursor, delta, quick.history.len());
                }
                _ => {
                    quick.input_cursor = step(quick.input_cursor, delta, quick.inputs.len());
                }
            }
        }
        UiMode::Compare | UiMode::CreatePrompt | UiMode::Settings => {}
    }
    UpdateResult::none()
}

/// Move a cursor within `0..len`, clamping at both ends
fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}
