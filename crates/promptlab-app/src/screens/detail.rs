//! Prompt detail screen state
//!
//! Holds the loaded prompt aggregate, the selected version, the pending
//! draft, the test form and the results of the last run. Every mutation
//! that reacts to a network response checks the identity the request was
//! issued for, so late responses can never overwrite newer state.

use promptlab_core::{AiProvider, Prompt, PromptId, TestInputs, TestRun, Version, VersionId};

use crate::config::DefaultsSettings;

/// Which part of the detail screen receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
    #[default]
    Versions,
    Draft,
    Inputs,
    Model,
}

impl DetailFocus {
    pub fn next(self) -> Self {
        match self {
            DetailFocus::Versions => DetailFocus::Draft,
            DetailFocus::Draft => DetailFocus::Inputs,
            DetailFocus::Inputs => DetailFocus::Model,
            DetailFocus::Model => DetailFocus::Versions,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            DetailFocus::Versions => DetailFocus::Model,
            DetailFocus::Draft => DetailFocus::Versions,
            DetailFocus::Inputs => DetailFocus::Draft,
            DetailFocus::Model => DetailFocus::Inputs,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub prompt_id: Option<PromptId>,
    pub prompt: Option<Prompt>,
    pub loading: bool,
    /// Bumped on every fetch; responses tagged with an older value are stale
    pub generation: u64,

    pub selected_version_id: Option<VersionId>,
    /// The next successful load selects the latest version instead of keeping the selection
    pub prefer_latest: bool,
    pub draft: String,
    pub saving: bool,

    pub test_inputs: TestInputs,
    pub input_cursor: usize,
    pub provider: AiProvider,
    pub model: String,
    pub testing: bool,
    /// Bumped on every test run; survives `open` like `generation`
    pub run_sequence: u64,
    pub current_result: Option<TestRun>,

    pub history: Vec<TestRun>,
    pub history_loading: bool,

    pub focus: DetailFocus,
}

impl DetailState {
    pub fn with_defaults(defaults: &DefaultsSettings) -> Self {
        Self {
            provider: defaults.provider,
            model: defaults.model.clone(),
            ..Default::default()
        }
    }

    /// Reset for a new prompt and return the generation to tag the fetch with
    pub fn open(&mut self, prompt_id: PromptId, defaults: &DefaultsSettings) -> u64 {
        let generation = self.generation + 1;
        let run_sequence = self.run_sequence;
        *self = Self::with_defaults(defaults);
        self.prompt_id = Some(prompt_id);
        self.generation = generation;
        self.run_sequence = run_sequence;
        self.loading = true;
        generation
    }

    /// Start a reload of the current prompt, keeping what is on screen
    pub fn begin_reload(&mut self) -> Option<(PromptId, u64)> {
        let prompt_id = self.prompt_id?;
        self.generation += 1;
        self.loading = true;
        Some((prompt_id, self.generation))
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Mark a test run in flight and return the sequence to tag it with
    pub fn begin_run(&mut self) -> u64 {
        self.run_sequence += 1;
        self.testing = true;
        self.current_result = None;
        self.run_sequence
    }

    pub fn is_current_run(&self, sequence: u64) -> bool {
        self.testing && sequence == self.run_sequence
    }

    /// Install a freshly loaded aggregate.
    ///
    /// Keeps the selection if the version still exists, otherwise falls back
    /// to the latest version. `prefer_latest` skips the first step once.
    /// Returns `true` when the selection changed.
    pub fn apply_prompt(&mut self, prompt: Prompt) -> bool {
        self.loading = false;
        self.prompt_id = Some(prompt.id);

        let prefer_latest = std::mem::take(&mut self.prefer_latest);
        let keep = self
            .selected_version_id
            .filter(|id| !prefer_latest && prompt.contains_version(*id));
        let target = keep.or_else(|| prompt.latest_version().map(|v| v.id));
        self.prompt = Some(prompt);

        let changed = target != self.selected_version_id;
        if changed {
            self.selected_version_id = target;
            self.reseed_draft();
            self.history.clear();
        }
        changed
    }

    pub fn selected_version(&self) -> Option<&Version> {
        let id = self.selected_version_id?;
        self.prompt.as_ref()?.version(id)
    }

    pub fn is_selected(&self, id: VersionId) -> bool {
        self.selected_version_id == Some(id)
    }

    /// Select a version of the loaded prompt.
    ///
    /// Unknown ids are ignored. Returns `true` when the selection changed,
    /// in which case the draft is reseeded and the history dropped.
    pub fn select_version(&mut self, id: VersionId) -> bool {
        let known = self
            .prompt
            .as_ref()
            .is_some_and(|p| p.contains_version(id));
        if !known || self.is_selected(id) {
            return false;
        }
        self.selected_version_id = Some(id);
        self.reseed_draft();
        self.history.clear();
        true
    }

    /// Id of the version `offset` positions away from the selection
    pub fn neighbour_version(&self, offset: isize) -> Option<VersionId> {
        let prompt = self.prompt.as_ref()?;
        if prompt.versions.is_empty() {
            return None;
        }
        let current = self
            .selected_version_id
            .and_then(|id| prompt.version_index(id))
            .unwrap_or(prompt.versions.len() - 1);
        let target = current
            .checked_add_signed(offset)?
            .min(prompt.versions.len() - 1);
        prompt.versions.get(target).map(|v| v.id)
    }

    /// Append a version echoed by the store and select it
    pub fn append_version(&mut self, version: Version) -> bool {
        let id = version.id;
        let Some(prompt) = self.prompt.as_mut() else {
            return false;
        };
        prompt.push_version(version);
        self.select_version(id) || self.is_selected(id)
    }

    /// Replace the aggregate with an echo from the store and select its latest version
    pub fn replace_with_aggregate(&mut self, prompt: Prompt) {
        self.prefer_latest = true;
        self.apply_prompt(prompt);
    }

    pub fn is_modified(&self) -> bool {
        match self.selected_version() {
            Some(version) => self.draft != version.content,
            None => false,
        }
    }

    fn reseed_draft(&mut self) {
        self.draft = self
            .selected_version()
            .map(|v| v.content.clone())
            .unwrap_or_default();
    }

    pub fn add_input(&mut self) {
        self.test_inputs.add();
        self.input_cursor = self.test_inputs.len() - 1;
    }

    pub fn remove_input(&mut self, index: usize) -> bool {
        let removed = self.test_inputs.remove(index);
        if self.input_cursor >= self.test_inputs.len() {
            self.input_cursor = self.test_inputs.len() - 1;
        }
        removed
    }

    pub fn edit_input(&mut self, index: usize, value: String) -> bool {
        self.test_inputs.edit(index, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_api::test_utils::sample_prompt;

    fn loaded(versions: u32) -> DetailState {
        let mut state = DetailState::default();
        state.open(PromptId(1), &DefaultsSettings::default());
        state.apply_prompt(sample_prompt(1, versions));
        state
    }

    #[test]
    fn test_load_selects_latest_and_seeds_draft() {
        let state = loaded(3);
        assert_eq!(state.selected_version_id, Some(VersionId(13)));
        assert_eq!(state.draft, "v3: answer {{question}}");
        assert!(!state.is_modified());
        assert!(!state.loading);
    }

    #[test]
    fn test_load_without_versions_selects_nothing() {
        let state = loaded(0);
        assert_eq!(state.selected_version_id, None);
        assert!(state.draft.is_empty());
        assert!(!state.is_modified());
    }

    #[test]
    fn test_select_reseeds_draft() {
        let mut state = loaded(2);
        state.draft.push_str(" edited");
        assert!(state.is_modified());

        assert!(state.select_version(VersionId(11)));
        assert_eq!(state.draft, "v1: answer {{question}}");
        assert!(!state.is_modified());
    }

    #[test]
    fn test_select_unknown_version_is_ignored() {
        let mut state = loaded(2);
        assert!(!state.select_version(VersionId(99)));
        assert_eq!(state.selected_version_id, Some(VersionId(12)));
    }

    #[test]
    fn test_reload_keeps_existing_selection_and_draft() {
        let mut state = loaded(3);
        state.select_version(VersionId(11));
        state.draft = "work in progress".into();

        state.begin_reload();
        assert!(!state.apply_prompt(sample_prompt(1, 3)));
        assert_eq!(state.selected_version_id, Some(VersionId(11)));
        assert_eq!(state.draft, "work in progress");
    }

    #[test]
    fn test_reload_redefaults_vanished_selection() {
        let mut state = loaded(3);
        state.select_version(VersionId(13));
        assert!(state.apply_prompt(sample_prompt(1, 2)));
        assert_eq!(state.selected_version_id, Some(VersionId(12)));
    }

    #[test]
    fn test_open_bumps_generation() {
        let mut state = DetailState::default();
        let first = state.open(PromptId(1), &DefaultsSettings::default());
        let second = state.open(PromptId(2), &DefaultsSettings::default());
        assert!(second > first);
        assert!(state.is_current(second));
        assert!(!state.is_current(first));
    }

    #[test]
    fn test_prefer_latest_applies_once() {
        let mut state = loaded(3);
        state.select_version(VersionId(11));
        state.prefer_latest = true;

        assert!(state.apply_prompt(sample_prompt(1, 3)));
        assert_eq!(state.selected_version_id, Some(VersionId(13)));
        assert!(!state.prefer_latest);

        state.select_version(VersionId(12));
        assert!(!state.apply_prompt(sample_prompt(1, 3)));
        assert_eq!(state.selected_version_id, Some(VersionId(12)));
    }

    #[test]
    fn test_run_sequence_survives_open() {
        let mut state = loaded(1);
        let first = state.begin_run();
        assert!(state.is_current_run(first));

        state.open(PromptId(2), &DefaultsSettings::default());
        assert!(!state.testing);
        assert!(!state.is_current_run(first));

        let second = state.begin_run();
        assert!(second > first);
        assert!(state.is_current_run(second));
        assert!(!state.is_current_run(first));
    }

    #[test]
    fn test_neighbour_version_clamps() {
        let state = loaded(3);
        assert_eq!(state.neighbour_version(-1), Some(VersionId(12)));
        assert_eq!(state.neighbour_version(1), Some(VersionId(13)));
        assert_eq!(state.neighbour_version(-5), None);
    }

    #[test]
    fn test_append_version_selects_it() {
        let mut state = loaded(1);
        let new_version = Version {
            id: VersionId(50),
            prompt_id: Some(PromptId(1)),
            version_number: 2,
            content: "fresh".into(),
            created_at: None,
        };
        assert!(state.append_version(new_version));
        assert_eq!(state.selected_version_id, Some(VersionId(50)));
        assert_eq!(state.draft, "fresh");
    }

    #[test]
    fn test_remove_input_keeps_cursor_in_range() {
        let mut state = loaded(1);
        state.add_input();
        assert_eq!(state.input_cursor, 1);
        assert!(state.remove_input(1));
        assert_eq!(state.input_cursor, 0);
        assert!(!state.remove_input(0));
        assert_eq!(state.test_inputs.len(), 1);
    }
}
