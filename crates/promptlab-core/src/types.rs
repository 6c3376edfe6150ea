//! Core domain types for prompts, versions and test runs
//!
//! All of these are read-through copies of records owned by the remote
//! prompt store. Wire names are camelCase; numeric fields the backend may
//! send as `null` decode to zero.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Name of the single template variable the client models for test inputs
pub const QUESTION_VARIABLE: &str = "question";

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(
    /// Identifier of a prompt in the remote store
    PromptId
);
id_newtype!(
    /// Identifier of a prompt version in the remote store
    VersionId
);
id_newtype!(
    /// Identifier of a persisted test run
    TestRunId
);

// ─────────────────────────────────────────────────────────────────────────────
// Prompt / Version
// ─────────────────────────────────────────────────────────────────────────────

/// A named prompt with its ordered version history.
///
/// `versions` is ordered by creation: the last element is the latest version.
/// List endpoints may omit versions entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: PromptId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub versions: Vec<Version>,
}

impl Prompt {
    /// The most recently created version, if any
    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Look up a version by id
    pub fn version(&self, id: VersionId) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Position of a version in creation order
    pub fn version_index(&self, id: VersionId) -> Option<usize> {
        self.versions.iter().position(|v| v.id == id)
    }

    pub fn contains_version(&self, id: VersionId) -> bool {
        self.version(id).is_some()
    }

    /// Description for display, with the placeholder the list view uses
    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => "No description provided",
        }
    }

    /// Append a version echoed by the store, keeping creation order.
    ///
    /// Returns `false` if a version with the same id is already present.
    pub fn push_version(&mut self, version: Version) -> bool {
        if self.contains_version(version.id) {
            return false;
        }
        self.versions.push(version);
        true
    }
}

/// One immutable snapshot of prompt content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: VersionId,
    #[serde(default)]
    pub prompt_id: Option<PromptId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Version {
    /// Short label such as `v3`
    pub fn label(&self) -> String {
        format!("v{}", self.version_number)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test inputs
// ─────────────────────────────────────────────────────────────────────────────

/// A single set of template variables for one test invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInput {
    pub question: String,
}

impl TestInput {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.question.trim().is_empty()
    }
}

/// Ordered list of test inputs that always holds at least one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInputs {
    inputs: Vec<TestInput>,
}

impl Default for TestInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInputs {
    /// A list with one blank input
    pub fn new() -> Self {
        Self {
            inputs: vec![TestInput::default()],
        }
    }

    /// Build from questions; an empty iterator yields a single blank input
    pub fn from_questions<I, S>(questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inputs: Vec<TestInput> = questions.into_iter().map(TestInput::new).collect();
        if inputs.is_empty() {
            Self::new()
        } else {
            Self { inputs }
        }
    }

    /// Append a blank input
    pub fn add(&mut self) {
        self.inputs.push(TestInput::default());
    }

    /// Remove the input at `index`.
    ///
    /// No-op (returns `false`) when only one input remains or the index is
    /// out of range.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.inputs.len() <= 1 || index >= self.inputs.len() {
            return false;
        }
        self.inputs.remove(index);
        true
    }

    /// Replace the input at `index`. Out-of-range indices are ignored.
    pub fn edit(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.inputs.get_mut(index) {
            Some(input) => {
                input.question = value.into();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Always false; present for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Whether the remove control should be offered
    pub fn can_remove(&self) -> bool {
        self.inputs.len() > 1
    }

    pub fn get(&self, index: usize) -> Option<&TestInput> {
        self.inputs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestInput> {
        self.inputs.iter()
    }

    pub fn as_slice(&self) -> &[TestInput] {
        &self.inputs
    }

    /// Inputs that carry content, in order; this is what gets submitted
    pub fn non_blank(&self) -> Vec<TestInput> {
        self.inputs
            .iter()
            .filter(|i| !i.is_blank())
            .cloned()
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────────────────────────────────────

/// LLM provider the backend should invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiProvider {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "anthropic")]
    Anthropic,
}

impl AiProvider {
    pub const ALL: [AiProvider; 2] = [AiProvider::OpenAi, AiProvider::Anthropic];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Anthropic => "anthropic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "OpenAI",
            AiProvider::Anthropic => "Anthropic (Claude)",
        }
    }

    /// Cycle to the next provider (selector behaviour)
    pub fn next(self) -> Self {
        match self {
            AiProvider::OpenAi => AiProvider::Anthropic,
            AiProvider::Anthropic => AiProvider::OpenAi,
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "anthropic" | "claude" => Ok(AiProvider::Anthropic),
            other => Err(format!("unknown AI provider: {other}")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test runs
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate metrics over one run's results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_response_time_ms: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_quality_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tokens: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_cost_usd: f64,
}

impl MetricsSummary {
    /// Compute metrics locally from per-input results.
    ///
    /// Mirrors the backend reduction: mean latency, mean quality, token sum,
    /// cost sum. An empty result set yields all zeros.
    pub fn summarize(results: &[TestResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let n = results.len() as f64;
        Self {
            average_response_time_ms: results.iter().map(|r| r.response_time_ms as f64).sum::<f64>()
                / n,
            average_quality_score: results.iter().map(|r| r.quality_score).sum::<f64>() / n,
            total_tokens: results.iter().map(|r| r.token_count).sum(),
            total_cost_usd: results.iter().map(|r| r.cost_usd).sum(),
        }
    }
}

/// Output of one input within a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub input_variables: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_response: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_time_ms: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cost_usd: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality_score: f64,
}

impl TestResult {
    /// The `question` input this result was produced for
    pub fn question(&self) -> &str {
        self.input_variables
            .get(QUESTION_VARIABLE)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A test run (persisted) or quick test (ephemeral) as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    #[serde(default)]
    pub id: Option<TestRunId>,
    #[serde(default)]
    pub prompt_version_id: Option<VersionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_provider: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model_name: String,
    #[serde(default)]
    pub started_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metrics: Option<MetricsSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<TestResult>,
}

impl TestRun {
    /// Server metrics, or a local summary when the response omitted them
    pub fn metrics(&self) -> MetricsSummary {
        self.metrics
            .clone()
            .unwrap_or_else(|| MetricsSummary::summarize(&self.results))
    }

    pub fn first_result(&self) -> Option<&TestResult> {
        self.results.first()
    }

    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("COMPLETED")
    }
}
