//! API key settings handlers

use crate::message::Message;
use crate::screens::SettingsState;
use crate::state::{AppState, UiMode};

use super::{UpdateAction, UpdateResult};

pub fn handle_open(state: &mut AppState) -> UpdateResult {
    if state.ui_mode != UiMode::Settings {
        state.previous_mode = state.ui_mode;
    }
    state.ui_mode = UiMode::Settings;
    state.settings_screen = SettingsState {
        loading: true,
        ..Default::default()
    };
    UpdateResult::action(UpdateAction::LoadApiKey)
}

pub fn handle_loaded(state: &mut AppState, key: Option<String>) -> UpdateResult {
    let screen = &mut state.settings_screen;
    screen.loading = false;
    screen.has_stored_key = key.is_some();
    screen.api_key = key.unwrap_or_default();
    UpdateResult::none()
}

pub fn handle_load_failed(state: &mut AppState, error: String) -> UpdateResult {
    state.settings_screen.loading = false;
    state
        .notifications
        .error(format!("Failed to read API key: {error}"));
    UpdateResult::none()
}

pub fn handle_edit(state: &mut AppState, value: String) -> UpdateResult {
    state.settings_screen.api_key = value;
    UpdateResult::none()
}

pub fn handle_toggle_reveal(state: &mut AppState) -> UpdateResult {
    state.settings_screen.reveal = !state.settings_screen.reveal;
    UpdateResult::none()
}

pub fn handle_save(state: &mut AppState) -> UpdateResult {
    let screen = &mut state.settings_screen;
    if screen.saving || screen.loading {
        return UpdateResult::none();
    }
    let key = screen.api_key.trim().to_string();
    screen.api_key = key.clone();
    screen.saving = true;
    UpdateResult::action(UpdateAction::SaveApiKey { key })
}

pub fn handle_clear(state: &mut AppState) -> UpdateResult {
    state.settings_screen.api_key.clear();
    UpdateResult::message(Message::SaveApiKey)
}

pub fn handle_saved(state: &mut AppState, stored: bool) -> UpdateResult {
    let screen = &mut state.settings_screen;
    screen.saving = false;
    screen.has_stored_key = stored;
    if stored {
        state.notifications.success("API key saved");
    } else {
        state.notifications.success("API key removed");
    }
    UpdateResult::none()
}

pub fn handle_save_failed(state: &mut AppState, error: String) -> UpdateResult {
    state.settings_screen.saving = false;
    state
        .notifications
        .error(format!("Failed to save API key: {error}"));
    UpdateResult::none()
}
