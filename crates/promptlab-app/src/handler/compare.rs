//! Version comparison handlers

use promptlab_core::prelude::*;
use promptlab_core::{Prompt, PromptId, TestInput, TestRun, VersionId};

use crate::message::PromptTarget;
use crate::screens::CompareSlot;
use crate::state::{AppState, UiMode};

use super::{UpdateAction, UpdateResult};

/// Open the comparator, reusing the detail screen's aggregate when it is loaded
pub fn handle_open(state: &mut AppState, prompt_id: PromptId) -> UpdateResult {
    let generation = state.compare.open(prompt_id, &state.settings.defaults);
    state.ui_mode = UiMode::Compare;

    let cached = state
        .detail
        .prompt
        .as_ref()
        .filter(|p| p.id == prompt_id && !state.detail.loading)
        .cloned();
    match cached {
        Some(prompt) => {
            state.compare.apply_prompt(prompt);
            UpdateResult::none()
        }
        None => UpdateResult::action(UpdateAction::FetchPrompt {
            prompt_id,
            target: PromptTarget::Compare,
            generation,
        }),
    }
}

pub fn handle_loaded(state: &mut AppState, generation: u64, prompt: Prompt) -> UpdateResult {
    if !state.compare.is_current(generation) {
        return UpdateResult::none();
    }
    state.compare.apply_prompt(prompt);
    UpdateResult::none()
}

pub fn handle_load_failed(state: &mut AppState, generation: u64, error: String) -> UpdateResult {
    if !state.compare.is_current(generation) {
        return UpdateResult::none();
    }
    state.compare.loading = false;
    state
        .notifications
        .error(format!("Failed to load prompt: {error}"));
    UpdateResult::none()
}

pub fn handle_set_slot(state: &mut AppState, slot: CompareSlot, id: VersionId) -> UpdateResult {
    state.compare.set_slot(slot, id);
    UpdateResult::none()
}

pub fn handle_cycle_slot(state: &mut AppState, slot: CompareSlot, forward: bool) -> UpdateResult {
    state.compare.cycle_slot(slot, forward);
    UpdateResult::none()
}

pub fn handle_edit_input(state: &mut AppState, input: String) -> UpdateResult {
    state.compare.input = input;
    UpdateResult::none()
}

pub fn handle_run(state: &mut AppState) -> UpdateResult {
    let compare = &mut state.compare;
    if compare.running {
        return UpdateResult::none();
    }
    let (Some(version_a), Some(version_b)) = (compare.slot_a, compare.slot_b) else {
        state.notifications.error("Select two versions to compare");
        return UpdateResult::none();
    };
    if compare.input.trim().is_empty() {
        state.notifications.error("Enter an input to compare with");
        return UpdateResult::none();
    }

    let sequence = compare.begin_run();
    debug!("Comparing {version_a} and {version_b} (run {sequence})");
    UpdateResult::action(UpdateAction::RunComparison {
        sequence,
        version_a,
        version_b,
        ai_provider: state.settings.defaults.provider,
        model_name: compare.model.clone(),
        input: TestInput::new(compare.input.trim()),
    })
}

/// Both sides succeeded; shown together or not at all
pub fn handle_completed(state: &mut AppState, sequence: u64, a: TestRun, b: TestRun) -> UpdateResult {
    if !state.compare.is_current_run(sequence) {
        debug!("Discarding comparison run {sequence}");
        return UpdateResult::none();
    }
    state.compare.running = false;
    state.compare.result_a = Some(a);
    state.compare.result_b = Some(b);
    UpdateResult::none()
}

pub fn handle_failed(state: &mut AppState, sequence: u64, error: String) -> UpdateResult {
    if !state.compare.is_current_run(sequence) {
        return UpdateResult::none();
    }
    state.compare.running = false;
    state.compare.result_a = None;
    state.compare.result_b = None;
    warn!("Comparison run {sequence} failed: {error}");
    state
        .notifications
        .error(format!("Failed to run comparison: {error}"));
    UpdateResult::none()
}
