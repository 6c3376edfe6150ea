//! # promptlab-api - Backend Client and Credential Storage
//!
//! Talks to the external prompt store / test executor over its JSON HTTP API
//! and owns the locally persisted provider API key.
//!
//! Depends on [`promptlab_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Client
//! - [`PromptApi`] - Async trait over every backend operation
//! - [`HttpPromptApi`] - reqwest implementation with a bounded request timeout
//!
//! ### Requests
//! - [`CreatePromptRequest`], [`TestRunRequest`], [`QuickTestRequest`] - Request bodies
//! - [`VersionMutation`] - What the store echoed after creating a version
//!
//! ### Credentials
//! - [`CredentialStore`] - Load/save/clear the provider API key
//! - [`FileCredentialStore`] - TOML file in the user data directory
//! - [`MemoryCredentialStore`] - Process-local store (headless overrides, tests)

pub mod client;
pub mod credentials;
pub mod requests;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{HttpPromptApi, LocalPromptApi, PromptApi, DEFAULT_TIMEOUT};
pub use credentials::{
    read_api_key, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    API_KEY_STORAGE_KEY,
};
pub use requests::{
    CreatePromptRequest, CreateVersionRequest, QuickTestRequest, TestRunRequest, VersionMutation,
};
