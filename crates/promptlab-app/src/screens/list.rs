//! Prompt list screen state

use promptlab_core::{Prompt, PromptId};

#[derive(Debug, Clone, Default)]
pub struct PromptListState {
    pub prompts: Vec<Prompt>,
    pub loading: bool,
    /// Set once the first fetch finished, successfully or not
    pub loaded: bool,
    pub selected: usize,
}

impl PromptListState {
    /// Replace the list, keeping the cursor on the same prompt when possible
    pub fn set_prompts(&mut self, prompts: Vec<Prompt>) {
        let current = self.selected_id();
        self.prompts = prompts;
        self.selected = current
            .and_then(|id| self.prompts.iter().position(|p| p.id == id))
            .unwrap_or(0);
        self.clamp();
    }

    /// Insert or replace a prompt and move the cursor onto it
    pub fn upsert(&mut self, prompt: Prompt) {
        match self.prompts.iter().position(|p| p.id == prompt.id) {
            Some(index) => {
                self.prompts[index] = prompt;
                self.selected = index;
            }
            None => {
                self.prompts.push(prompt);
                self.selected = self.prompts.len() - 1;
            }
        }
    }

    pub fn selected_id(&self) -> Option<PromptId> {
        self.prompts.get(self.selected).map(|p| p.id)
    }

    pub fn select_next(&mut self) {
        if !self.prompts.is_empty() {
            self.selected = (self.selected + 1) % self.prompts.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.prompts.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.prompts.len() - 1);
        }
    }

    fn clamp(&mut self) {
        if self.selected >= self.prompts.len() {
            self.selected = self.prompts.len().saturating_sub(1);
        }
    }
}
