//! Create-prompt form handlers

use promptlab_api::CreatePromptRequest;
use promptlab_core::prelude::*;
use promptlab_core::{Field, Prompt};

use crate::screens::CreatePromptState;
use crate::state::{AppState, UiMode};

use super::{detail, UpdateAction, UpdateResult};

pub fn handle_open(state: &mut AppState) -> UpdateResult {
    state.create = CreatePromptState::default();
    state.ui_mode = UiMode::CreatePrompt;
    UpdateResult::none()
}

pub fn handle_edit(state: &mut AppState, field: Field, value: String) -> UpdateResult {
    state.create.edit_field(field, value);
    UpdateResult::none()
}

/// Validate locally; only a clean form reaches the network
pub fn handle_submit(state: &mut AppState) -> UpdateResult {
    let create = &mut state.create;
    if create.submitting {
        return UpdateResult::none();
    }
    if let Err(errors) = create.draft.validate() {
        debug!("Create prompt rejected: {errors}");
        create.errors = errors;
        return UpdateResult::none();
    }
    create.errors = Default::default();
    create.submitting = true;
    UpdateResult::action(UpdateAction::CreatePrompt(CreatePromptRequest::from(
        &create.draft,
    )))
}

/// Open the echoed aggregate directly
pub fn handle_created(state: &mut AppState, prompt: Prompt) -> UpdateResult {
    info!("Created prompt {} ({})", prompt.name, prompt.id);
    state.create = CreatePromptState::default();
    state
        .notifications
        .success(format!("Created prompt \"{}\"", prompt.name));
    state.prompt_list.upsert(prompt.clone());
    detail::handle_show_prompt(state, prompt)
}

pub fn handle_failed(state: &mut AppState, error: String) -> UpdateResult {
    state.create.submitting = false;
    state
        .notifications
        .error(format!("Failed to create prompt: {error}"));
    UpdateResult::none()
}
