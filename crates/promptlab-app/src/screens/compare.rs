//! Side-by-side version comparison state

use promptlab_core::{Prompt, PromptId, TestRun, VersionId};

use crate::config::DefaultsSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareSlot {
    A,
    B,
}

impl CompareSlot {
    pub fn label(&self) -> &'static str {
        match self {
            CompareSlot::A => "A",
            CompareSlot::B => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareFocus {
    #[default]
    SlotA,
    SlotB,
    Input,
}

impl CompareFocus {
    pub fn next(self) -> Self {
        match self {
            CompareFocus::SlotA => CompareFocus::SlotB,
            CompareFocus::SlotB => CompareFocus::Input,
            CompareFocus::Input => CompareFocus::SlotA,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompareState {
    pub prompt_id: Option<PromptId>,
    pub prompt: Option<Prompt>,
    pub loading: bool,
    pub generation: u64,

    pub slot_a: Option<VersionId>,
    pub slot_b: Option<VersionId>,
    pub input: String,
    pub model: String,

    pub running: bool,
    /// Bumped per run; completions for an older run are discarded
    pub sequence: u64,
    pub result_a: Option<TestRun>,
    pub result_b: Option<TestRun>,

    pub focus: CompareFocus,
}

impl CompareState {
    /// Reset for a prompt and return the generation to tag its fetch with
    pub fn open(&mut self, prompt_id: PromptId, defaults: &DefaultsSettings) -> u64 {
        let generation = self.generation + 1;
        let sequence = self.sequence + 1;
        *self = Self {
            prompt_id: Some(prompt_id),
            loading: true,
            generation,
            sequence,
            input: defaults.compare_input.clone(),
            model: defaults.compare_model.clone(),
            ..Default::default()
        };
        generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Install the prompt and default the slots to latest / second-latest.
    ///
    /// With a single version both slots point at it.
    pub fn apply_prompt(&mut self, prompt: Prompt) {
        let n = prompt.versions.len();
        self.slot_a = prompt.versions.last().map(|v| v.id);
        self.slot_b = match n {
            0 => None,
            1 => self.slot_a,
            _ => Some(prompt.versions[n - 2].id),
        };
        self.loading = false;
        self.prompt_id = Some(prompt.id);
        self.prompt = Some(prompt);
    }

    pub fn slot(&self, slot: CompareSlot) -> Option<VersionId> {
        match slot {
            CompareSlot::A => self.slot_a,
            CompareSlot::B => self.slot_b,
        }
    }

    /// Point a slot at a version of the loaded prompt; unknown ids are ignored
    pub fn set_slot(&mut self, slot: CompareSlot, id: VersionId) -> bool {
        if !self
            .prompt
            .as_ref()
            .is_some_and(|p| p.contains_version(id))
        {
            return false;
        }
        match slot {
            CompareSlot::A => self.slot_a = Some(id),
            CompareSlot::B => self.slot_b = Some(id),
        }
        true
    }

    /// Move a slot one version forward or back through the history
    pub fn cycle_slot(&mut self, slot: CompareSlot, forward: bool) -> Option<VersionId> {
        let prompt = self.prompt.as_ref()?;
        let n = prompt.versions.len();
        if n == 0 {
            return None;
        }
        let current = self
            .slot(slot)
            .and_then(|id| prompt.version_index(id))
            .unwrap_or(n - 1);
        let next = if forward {
            (current + 1) % n
        } else {
            (current + n - 1) % n
        };
        let id = prompt.versions[next].id;
        self.set_slot(slot, id);
        Some(id)
    }

    /// Start a run: clear both results and return its sequence number
    pub fn begin_run(&mut self) -> u64 {
        self.sequence += 1;
        self.running = true;
        self.result_a = None;
        self.result_b = None;
        self.sequence
    }

    pub fn is_current_run(&self, sequence: u64) -> bool {
        sequence == self.sequence
    }

    pub fn version_label(&self, slot: CompareSlot) -> String {
        self.slot(slot)
            .and_then(|id| self.prompt.as_ref()?.version(id))
            .map(|v| v.label())
            .unwrap_or_else(|| "-".to_string())
    }
}
