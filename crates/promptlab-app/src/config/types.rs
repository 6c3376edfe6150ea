//! Configuration types for promptlab
//!
//! Defines `Settings` (the whole `config.toml`) and its sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use promptlab_core::AiProvider;

/// Application settings (`<config_dir>/promptlab/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub defaults: DefaultsSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Backend connection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Base URL of the prompt store / test executor
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for a single request, LLM runs included
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Initial values for the test forms
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DefaultsSettings {
    #[serde(default)]
    pub provider: AiProvider,

    #[serde(default = "default_model")]
    pub model: String,

    /// Model used by the version comparator
    #[serde(default = "default_compare_model")]
    pub compare_model: String,

    /// Shared input pre-filled on the comparator
    #[serde(default = "default_compare_input")]
    pub compare_input: String,
}

impl Default for DefaultsSettings {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            model: default_model(),
            compare_model: default_compare_model(),
            compare_input: default_compare_input(),
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_compare_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_compare_input() -> String {
    "Explain quantum computing".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    /// How long a toast stays on screen
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,

    /// Entries kept in the session-only quick-test history
    #[serde(default = "default_quick_test_history")]
    pub quick_test_history: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            notification_ms: default_notification_ms(),
            quick_test_history: default_quick_test_history(),
        }
    }
}

fn default_notification_ms() -> u64 {
    4000
}

fn default_quick_test_history() -> usize {
    20
}
