//! Message types for the application (TEA pattern)
//!
//! User intents come in from key handling or the headless runner; network
//! outcomes come back from `actions` tagged with the identity they were
//! issued for.

use std::path::PathBuf;

use promptlab_api::VersionMutation;
use promptlab_core::{AiProvider, Field, Prompt, PromptId, TestRun, VersionId};

use crate::input_key::InputKey;
use crate::screens::CompareSlot;

#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard input from the terminal
    Key(InputKey),
    /// Periodic tick (expires notifications)
    Tick,
    Quit,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    ShowPromptList,
    OpenPrompt(PromptId),
    /// Open the comparator for a prompt
    OpenCompare(PromptId),
    OpenQuickTest,
    OpenCreatePrompt,
    OpenSettings,
    /// Leave the current screen
    Back,
    /// Move keyboard focus within the current screen
    FocusNext,
    FocusPrevious,
    /// Move the cursor of the focused list
    CursorUp,
    CursorDown,

    // ─────────────────────────────────────────────────────────
    // Prompt list
    // ─────────────────────────────────────────────────────────
    RefreshPrompts,
    PromptsLoaded(Vec<Prompt>),
    PromptsLoadFailed(String),
    ListNext,
    ListPrevious,
    OpenSelectedPrompt,

    // ─────────────────────────────────────────────────────────
    // Prompt fetch (detail and comparator)
    // ─────────────────────────────────────────────────────────
    PromptLoaded {
        target: PromptTarget,
        generation: u64,
        prompt: Prompt,
    },
    PromptLoadFailed {
        target: PromptTarget,
        generation: u64,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Detail: versions and draft
    // ─────────────────────────────────────────────────────────
    SelectVersion(VersionId),
    SelectNextVersion,
    SelectPreviousVersion,
    EditDraft(String),
    SaveVersion,
    VersionSaved {
        prompt_id: PromptId,
        mutation: VersionMutation,
    },
    VersionSaveFailed {
        prompt_id: PromptId,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Detail: test form, results and history
    // ─────────────────────────────────────────────────────────
    AddTestInput,
    RemoveTestInput(usize),
    EditTestInput {
        index: usize,
        value: String,
    },
    SetProvider(AiProvider),
    SetModel(String),
    RunTest,
    /// Tagged with the run sequence the request was issued for
    TestRunCompleted {
        sequence: u64,
        version_id: VersionId,
        run: TestRun,
    },
    TestRunFailed {
        sequence: u64,
        version_id: VersionId,
        error: String,
    },
    HistoryLoaded {
        version_id: VersionId,
        runs: Vec<TestRun>,
    },
    HistoryLoadFailed {
        version_id: VersionId,
        error: String,
    },
    /// Export the current result set; `None` picks a default file name
    ExportResults(Option<PathBuf>),
    ExportCompleted(PathBuf),
    ExportFailed(String),

    // ─────────────────────────────────────────────────────────
    // Comparator
    // ─────────────────────────────────────────────────────────
    SetCompareSlot {
        slot: CompareSlot,
        version_id: VersionId,
    },
    CycleCompareSlot {
        slot: CompareSlot,
        forward: bool,
    },
    EditCompareInput(String),
    RunComparison,
    ComparisonCompleted {
        sequence: u64,
        a: TestRun,
        b: TestRun,
    },
    ComparisonFailed {
        sequence: u64,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Quick test
    // ─────────────────────────────────────────────────────────
    EditQuickContent(String),
    AddQuickInput,
    RemoveQuickInput(usize),
    EditQuickInput {
        index: usize,
        value: String,
    },
    SetQuickProvider(AiProvider),
    SetQuickModel(String),
    RunQuickTest,
    QuickTestCompleted(TestRun),
    QuickTestFailed(String),
    LoadQuickHistory(usize),

    // ─────────────────────────────────────────────────────────
    // Create prompt
    // ─────────────────────────────────────────────────────────
    EditCreateField {
        field: Field,
        value: String,
    },
    SubmitCreatePrompt,
    PromptCreated(Prompt),
    PromptCreateFailed(String),

    // ─────────────────────────────────────────────────────────
    // API key
    // ─────────────────────────────────────────────────────────
    ApiKeyLoaded(Option<String>),
    ApiKeyLoadFailed(String),
    EditApiKey(String),
    ToggleRevealApiKey,
    SaveApiKey,
    /// Empty the buffer and save, removing the stored key
    ClearApiKey,
    ApiKeySaved {
        stored: bool,
    },
    ApiKeySaveFailed(String),
}

/// Which screen a prompt fetch was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTarget {
    Detail,
    Compare,
}
