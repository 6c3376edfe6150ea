//! Prompt list handlers

use promptlab_core::prelude::*;
use promptlab_core::Prompt;

use crate::message::Message;
use crate::state::{AppState, UiMode};

use super::{UpdateAction, UpdateResult};

/// Switch to the list, fetching it the first time
pub fn handle_show(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::PromptList;
    if state.prompt_list.loaded || state.prompt_list.loading {
        return UpdateResult::none();
    }
    handle_refresh(state)
}

pub fn handle_refresh(state: &mut AppState) -> UpdateResult {
    if state.prompt_list.loading {
        return UpdateResult::none();
    }
    state.prompt_list.loading = true;
    UpdateResult::action(UpdateAction::FetchPrompts)
}

pub fn handle_loaded(state: &mut AppState, prompts: Vec<Prompt>) -> UpdateResult {
    debug!("Loaded {} prompts", prompts.len());
    let list = &mut state.prompt_list;
    list.loading = false;
    list.loaded = true;
    list.set_prompts(prompts);
    UpdateResult::none()
}

pub fn handle_load_failed(state: &mut AppState, error: String) -> UpdateResult {
    state.prompt_list.loading = false;
    state.prompt_list.loaded = true;
    state
        .notifications
        .error(format!("Failed to load prompts: {error}"));
    UpdateResult::none()
}

pub fn handle_open_selected(state: &AppState) -> UpdateResult {
    match state.prompt_list.selected_id() {
        Some(id) => UpdateResult::message(Message::OpenPrompt(id)),
        None => UpdateResult::none(),
    }
}
