//! Settings loader for `<config_dir>/promptlab/config.toml`

use std::path::{Path, PathBuf};

use super::types::Settings;
use promptlab_core::prelude::*;

const CONFIG_DIR: &str = "promptlab";
const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV_VAR: &str = "PROMPTLAB_API_URL";

/// Default location of the settings file
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILENAME)
}

/// Load settings from `path`, then apply environment overrides.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = read_settings_file(path);
    apply_env_overrides(&mut settings);
    settings
}

fn read_settings_file(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
        let url = url.trim();
        if !url.is_empty() {
            debug!("{} overrides api.base_url", API_URL_ENV_VAR);
            settings.api.base_url = url.to_string();
        }
    }
}

/// Write a commented default config file at `path`.
///
/// Leaves an existing file untouched. Returns `true` if a file was written.
pub fn init_config_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {:?}: {}", parent, e)))?;
    }

    std::fs::write(path, generate_default_config())
        .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;

    info!("Wrote default config to {:?}", path);
    Ok(true)
}

fn generate_default_config() -> String {
    r#"# promptlab configuration

[api]
base_url = "http://localhost:8080"   # Overridden by PROMPTLAB_API_URL
timeout_secs = 120                   # Per request, test runs included

[defaults]
provider = "openai"                  # "openai" or "anthropic"
model = "gpt-4"
compare_model = "gpt-3.5-turbo"
compare_input = "Explain quantum computing"

[ui]
notification_ms = 4000
quick_test_history = 20              # Session-only, never written to disk
"#
    .to_string()
}
