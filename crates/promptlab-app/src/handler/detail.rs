//! Prompt detail handlers
//!
//! Loading, version selection, drafting, test runs, history and export.
//! Every response handler checks the identity its request was issued for
//! before touching state.

use std::path::PathBuf;

use chrono::Local;
use promptlab_api::{TestRunRequest, VersionMutation};
use promptlab_core::prelude::*;
use promptlab_core::{
    validate_test_inputs, validate_version_content, AiProvider, Prompt, PromptId, TestRun,
    VersionId,
};

use crate::message::PromptTarget;
use crate::state::{AppState, UiMode};

use super::{UpdateAction, UpdateResult};

/// Open a prompt: reset the screen and fetch the aggregate
pub fn handle_open(state: &mut AppState, prompt_id: PromptId) -> UpdateResult {
    let generation = state.detail.open(prompt_id, &state.settings.defaults);
    state.ui_mode = UiMode::Detail;
    debug!("Opening prompt {prompt_id} (generation {generation})");
    UpdateResult::action(UpdateAction::FetchPrompt {
        prompt_id,
        target: PromptTarget::Detail,
        generation,
    })
}

/// Show an already-known aggregate without a round trip
pub fn handle_show_prompt(state: &mut AppState, prompt: Prompt) -> UpdateResult {
    state.detail.open(prompt.id, &state.settings.defaults);
    state.ui_mode = UiMode::Detail;
    state.detail.apply_prompt(prompt);
    history_fetch(state)
}

pub fn handle_loaded(state: &mut AppState, generation: u64, prompt: Prompt) -> UpdateResult {
    if !state.detail.is_current(generation) {
        debug!(
            "Discarding stale prompt {} (generation {generation}, current {})",
            prompt.id, state.detail.generation
        );
        return UpdateResult::none();
    }

    let changed = state.detail.apply_prompt(prompt);
    if changed || state.detail.history.is_empty() {
        return history_fetch(state);
    }
    UpdateResult::none()
}

pub fn handle_load_failed(state: &mut AppState, generation: u64, error: String) -> UpdateResult {
    if !state.detail.is_current(generation) {
        return UpdateResult::none();
    }
    state.detail.loading = false;
    warn!("Failed to load prompt: {error}");
    state
        .notifications
        .error(format!("Failed to load prompt: {error}"));
    UpdateResult::none()
}

/// Fetch the history of the selected version, if any
fn history_fetch(state: &mut AppState) -> UpdateResult {
    match state.detail.selected_version_id {
        Some(version_id) => {
            state.detail.history_loading = true;
            UpdateResult::action(UpdateAction::FetchHistory { version_id })
        }
        None => {
            state.detail.history_loading = false;
            UpdateResult::none()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Versions and draft
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_select(state: &mut AppState, version_id: VersionId) -> UpdateResult {
    if !state.detail.select_version(version_id) {
        return UpdateResult::none();
    }
    state.detail.current_result = None;
    history_fetch(state)
}

pub fn handle_select_neighbour(state: &mut AppState, offset: isize) -> UpdateResult {
    match state.detail.neighbour_version(offset) {
        Some(id) => handle_select(state, id),
        None => UpdateResult::none(),
    }
}

pub fn handle_edit_draft(state: &mut AppState, draft: String) -> UpdateResult {
    state.detail.draft = draft;
    UpdateResult::none()
}

pub fn handle_save_version(state: &mut AppState) -> UpdateResult {
    let detail = &mut state.detail;
    let Some(prompt_id) = detail.prompt_id else {
        return UpdateResult::none();
    };
    if detail.saving {
        return UpdateResult::none();
    }
    if !detail.is_modified() {
        state.notifications.info("No changes to save");
        return UpdateResult::none();
    }
    if let Err(errors) = validate_version_content(&detail.draft) {
        state.notifications.error(errors.to_string());
        return UpdateResult::none();
    }

    detail.saving = true;
    UpdateResult::action(UpdateAction::CreateVersion {
        prompt_id,
        content: detail.draft.clone(),
    })
}

pub fn handle_version_saved(
    state: &mut AppState,
    prompt_id: PromptId,
    mutation: VersionMutation,
) -> UpdateResult {
    if state.detail.prompt_id != Some(prompt_id) {
        debug!("Version saved for prompt {prompt_id}, no longer open");
        return UpdateResult::none();
    }
    state.detail.saving = false;

    match mutation {
        VersionMutation::Aggregate(prompt) => {
            state.prompt_list.upsert(prompt.clone());
            state.detail.replace_with_aggregate(prompt);
            state.detail.current_result = None;
            state.notifications.success("Version saved");
            history_fetch(state)
        }
        VersionMutation::Version(version) => {
            let label = version.label();
            state.detail.append_version(version);
            state.detail.current_result = None;
            if let Some(prompt) = state.detail.prompt.clone() {
                state.prompt_list.upsert(prompt);
            }
            state.notifications.success(format!("Saved {label}"));
            history_fetch(state)
        }
        VersionMutation::Unrecognized => {
            info!("Unrecognized create-version response, reloading prompt {prompt_id}");
            state.notifications.success("Version saved");
            // The echo cannot be reconciled; reload and land on the latest version
            state.detail.prefer_latest = true;
            match state.detail.begin_reload() {
                Some((prompt_id, generation)) => {
                    UpdateResult::action(UpdateAction::FetchPrompt {
                        prompt_id,
                        target: PromptTarget::Detail,
                        generation,
                    })
                }
                None => UpdateResult::none(),
            }
        }
    }
}

pub fn handle_version_save_failed(
    state: &mut AppState,
    prompt_id: PromptId,
    error: String,
) -> UpdateResult {
    if state.detail.prompt_id == Some(prompt_id) {
        state.detail.saving = false;
    }
    state
        .notifications
        .error(format!("Failed to save version: {error}"));
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test form
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_add_input(state: &mut AppState) -> UpdateResult {
    state.detail.add_input();
    UpdateResult::none()
}

pub fn handle_remove_input(state: &mut AppState, index: usize) -> UpdateResult {
    state.detail.remove_input(index);
    UpdateResult::none()
}

pub fn handle_edit_input(state: &mut AppState, index: usize, value: String) -> UpdateResult {
    state.detail.edit_input(index, value);
    UpdateResult::none()
}

pub fn handle_set_provider(state: &mut AppState, provider: AiProvider) -> UpdateResult {
    state.detail.provider = provider;
    UpdateResult::none()
}

pub fn handle_set_model(state: &mut AppState, model: String) -> UpdateResult {
    state.detail.model = model;
    UpdateResult::none()
}

pub fn handle_run_test(state: &mut AppState) -> UpdateResult {
    let detail = &mut state.detail;
    if detail.testing {
        debug!("Test run already in flight");
        return UpdateResult::none();
    }
    let Some(version_id) = detail.selected_version_id else {
        state.notifications.error("Select a version to test");
        return UpdateResult::none();
    };
    let test_inputs = match validate_test_inputs(&detail.test_inputs) {
        Ok(inputs) => inputs,
        Err(errors) => {
            state.notifications.error(errors.to_string());
            return UpdateResult::none();
        }
    };
    if detail.model.trim().is_empty() {
        state.notifications.error("Model name is required");
        return UpdateResult::none();
    }

    let sequence = detail.begin_run();
    UpdateResult::action(UpdateAction::RunTest {
        sequence,
        request: TestRunRequest {
            prompt_version_id: version_id,
            ai_provider: detail.provider,
            model_name: detail.model.trim().to_string(),
            test_inputs,
        },
    })
}

pub fn handle_test_completed(
    state: &mut AppState,
    sequence: u64,
    version_id: VersionId,
    run: TestRun,
) -> UpdateResult {
    if !state.detail.is_current_run(sequence) {
        debug!("Ignoring stale test run {sequence} for version {version_id}");
        return UpdateResult::none();
    }
    state.detail.testing = false;
    if !state.detail.is_selected(version_id) {
        debug!("Discarding result for version {version_id}, no longer selected");
        return history_fetch(state);
    }
    state.detail.current_result = Some(run);
    state.notifications.success("Test run completed");
    history_fetch(state)
}

pub fn handle_test_failed(
    state: &mut AppState,
    sequence: u64,
    version_id: VersionId,
    error: String,
) -> UpdateResult {
    if !state.detail.is_current_run(sequence) {
        debug!("Ignoring stale failure of test run {sequence}: {error}");
        return UpdateResult::none();
    }
    state.detail.testing = false;
    warn!("Test run for version {version_id} failed: {error}");
    state
        .notifications
        .error(format!("Failed to run test: {error}"));
    UpdateResult::none()
}

pub fn handle_history_loaded(
    state: &mut AppState,
    version_id: VersionId,
    runs: Vec<TestRun>,
) -> UpdateResult {
    if !state.detail.is_selected(version_id) {
        return UpdateResult::none();
    }
    state.detail.history_loading = false;
    state.detail.history = runs;
    UpdateResult::none()
}

pub fn handle_history_failed(
    state: &mut AppState,
    version_id: VersionId,
    error: String,
) -> UpdateResult {
    if !state.detail.is_selected(version_id) {
        return UpdateResult::none();
    }
    state.detail.history_loading = false;
    state
        .notifications
        .error(format!("Failed to load test history: {error}"));
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────────────────────────
// Export
// ─────────────────────────────────────────────────────────────────────────────

/// Default export file name for the selected version
pub fn default_export_path(state: &AppState) -> PathBuf {
    let number = state
        .detail
        .selected_version()
        .map(|v| v.version_number)
        .unwrap_or_default();
    PathBuf::from(format!(
        "promptlab-v{number}-{}.csv",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}

pub fn handle_export(state: &mut AppState, path: Option<PathBuf>) -> UpdateResult {
    let Some(run) = state.detail.current_result.as_ref() else {
        state.notifications.info("Run a test before exporting");
        return UpdateResult::none();
    };
    if run.results.is_empty() {
        state.notifications.info("No results to export");
        return UpdateResult::none();
    }
    let results = run.results.clone();
    let path = path.unwrap_or_else(|| default_export_path(state));
    UpdateResult::action(UpdateAction::ExportCsv { path, results })
}

pub fn handle_export_completed(state: &mut AppState, path: PathBuf) -> UpdateResult {
    state
        .notifications
        .success(format!("Exported results to {}", path.display()));
    UpdateResult::none()
}

pub fn handle_export_failed(state: &mut AppState, error: String) -> UpdateResult {
    state
        .notifications
        .error(format!("Failed to export results: {error}"));
    UpdateResult::none()
}
