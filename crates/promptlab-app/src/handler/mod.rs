//! Handler module - TEA update function and per-screen handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for each screen
//! - `list`, `detail`, `compare`, `quick_test`, `create`, `settings`: screen handlers

pub(crate) mod compare;
pub(crate) mod create;
pub(crate) mod detail;
pub(crate) mod keys;
pub(crate) mod list;
pub(crate) mod settings;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use promptlab_api::{CreatePromptRequest, QuickTestRequest, TestRunRequest};
use promptlab_core::{AiProvider, PromptId, TestInput, TestResult, VersionId};

use crate::message::{Message, PromptTarget};

pub use update::update;

/// Effects the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// `GET /api/prompts`
    FetchPrompts,

    /// `GET /api/prompts/{id}`, answered with a message tagged `(target, generation)`
    FetchPrompt {
        prompt_id: PromptId,
        target: PromptTarget,
        generation: u64,
    },

    CreatePrompt(CreatePromptRequest),

    CreateVersion {
        prompt_id: PromptId,
        content: String,
    },

    /// Run a saved version. The API key is read when the task executes.
    RunTest {
        sequence: u64,
        request: TestRunRequest,
    },

    FetchHistory {
        version_id: VersionId,
    },

    /// Run two versions concurrently on one input; both must succeed
    RunComparison {
        sequence: u64,
        version_a: VersionId,
        version_b: VersionId,
        ai_provider: AiProvider,
        model_name: String,
        input: TestInput,
    },

    RunQuickTest(QuickTestRequest),

    ExportCsv {
        path: PathBuf,
        results: Vec<TestResult>,
    },

    LoadApiKey,

    /// Store a key; blank removes it
    SaveApiKey {
        key: String,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
