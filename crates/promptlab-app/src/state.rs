//! Application state (Model in TEA pattern)

use std::time::Duration;

use crate::config::Settings;
use crate::notification::Notifications;
use crate::screens::{
    CompareState, CreatePromptState, DetailState, PromptListState, QuickTestState, SettingsState,
};

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// All prompts; the start screen
    #[default]
    PromptList,

    /// One prompt: versions, draft, test form, results and history
    Detail,

    /// Two versions of the same prompt run side by side
    Compare,

    /// Ad-hoc content run without saving a version
    QuickTest,

    /// New prompt form
    CreatePrompt,

    /// Provider API key
    Settings,
}

impl UiMode {
    pub fn title(&self) -> &'static str {
        match self {
            UiMode::PromptList => "Prompts",
            UiMode::Detail => "Prompt",
            UiMode::Compare => "Compare Versions",
            UiMode::QuickTest => "Quick Test",
            UiMode::CreatePrompt => "New Prompt",
            UiMode::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub ui_mode: UiMode,
    /// Where `Back` returns to from the settings screen
    pub previous_mode: UiMode,
    pub phase: AppPhase,
    pub settings: Settings,

    pub prompt_list: PromptListState,
    pub detail: DetailState,
    pub compare: CompareState,
    pub quick_test: QuickTestState,
    pub create: CreatePromptState,
    pub settings_screen: SettingsState,

    pub notifications: Notifications,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            ui_mode: UiMode::PromptList,
            previous_mode: UiMode::PromptList,
            phase: AppPhase::Running,
            prompt_list: PromptListState::default(),
            detail: DetailState::with_defaults(&settings.defaults),
            compare: CompareState::default(),
            quick_test: QuickTestState::new(&settings.defaults, settings.ui.quick_test_history),
            create: CreatePromptState::default(),
            settings_screen: SettingsState::default(),
            notifications: Notifications::new(Duration::from_millis(settings.ui.notification_ms)),
            settings,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    /// Whether any request the user is waiting on is still outstanding
    pub fn is_busy(&self) -> bool {
        self.prompt_list.loading
            || self.detail.loading
            || self.detail.saving
            || self.detail.testing
            || self.detail.history_loading
            || self.compare.loading
            || self.compare.running
            || self.quick_test.running
            || self.create.submitting
            || self.settings_screen.loading
            || self.settings_screen.saving
    }
}
