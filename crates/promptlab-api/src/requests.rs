//! Request bodies and response reconciliation for the backend API

use serde::{Deserialize, Serialize};
use serde_json::Value;

use promptlab_core::{AiProvider, Prompt, PromptDraft, TestInput, Version, VersionId};

/// Body of `POST /api/prompts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptRequest {
    pub name: String,
    pub description: String,
    pub initial_content: String,
}

impl From<&PromptDraft> for CreatePromptRequest {
    fn from(draft: &PromptDraft) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            description: draft.description.trim().to_string(),
            initial_content: draft.initial_content.clone(),
        }
    }
}

/// Body of `POST /api/prompts/{id}/versions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVersionRequest {
    pub content: String,
}

/// Body of `POST /api/test-runs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunRequest {
    pub prompt_version_id: VersionId,
    pub ai_provider: AiProvider,
    pub model_name: String,
    pub test_inputs: Vec<TestInput>,
}

/// Body of `POST /api/quick-test`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickTestRequest {
    pub prompt_content: String,
    pub ai_provider: AiProvider,
    pub model_name: String,
    pub test_inputs: Vec<TestInput>,
}

/// What the store echoed after a version was created.
///
/// Depending on the backend revision the response is either the whole
/// prompt aggregate or only the new version. Anything else means the local
/// copy has to be reloaded.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionMutation {
    /// Updated prompt including the new version
    Aggregate(Prompt),
    /// Just the newly created version
    Version(Version),
    /// Body did not match either shape
    Unrecognized,
}

impl VersionMutation {
    /// Classify a decoded response body
    pub fn from_value(value: Value) -> Self {
        let Some(object) = value.as_object() else {
            return VersionMutation::Unrecognized;
        };

        if object.get("versions").is_some_and(Value::is_array) && object.contains_key("name") {
            if let Ok(prompt) = serde_json::from_value::<Prompt>(value.clone()) {
                return VersionMutation::Aggregate(prompt);
            }
        }

        if object.contains_key("content") && object.contains_key("versionNumber") {
            if let Ok(version) = serde_json::from_value::<Version>(value) {
                return VersionMutation::Version(version);
            }
        }

        VersionMutation::Unrecognized
    }
}
