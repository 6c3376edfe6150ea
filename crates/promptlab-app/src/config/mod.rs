//! Configuration file parsing for promptlab
//!
//! Supports `<config_dir>/promptlab/config.toml` with a `PROMPTLAB_API_URL`
//! environment override.

pub mod settings;
pub mod types;

pub use settings::{default_config_path, init_config_file, load_settings, API_URL_ENV_VAR};
pub use types::*;
