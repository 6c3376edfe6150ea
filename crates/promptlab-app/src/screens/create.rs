//! Create-prompt form state

use promptlab_core::{Field, PromptDraft, ValidationErrors};

pub const CREATE_FIELDS: [Field; 3] = [Field::Name, Field::Description, Field::InitialContent];

#[derive(Debug, Clone)]
pub struct CreatePromptState {
    pub draft: PromptDraft,
    pub errors: ValidationErrors,
    pub submitting: bool,
    pub focus: Field,
}

impl Default for CreatePromptState {
    fn default() -> Self {
        Self {
            draft: PromptDraft::default(),
            errors: ValidationErrors::default(),
            submitting: false,
            focus: Field::Name,
        }
    }
}

impl CreatePromptState {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.draft.name,
            Field::Description => &self.draft.description,
            _ => &self.draft.initial_content,
        }
    }

    /// Replace a field's value and clear that field's error
    pub fn edit_field(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.draft.name = value,
            Field::Description => self.draft.description = value,
            Field::InitialContent => self.draft.initial_content = value,
            _ => return,
        }
        self.errors.clear(field);
    }

    pub fn focus_next(&mut self) {
        let index = CREATE_FIELDS
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        self.focus = CREATE_FIELDS[(index + 1) % CREATE_FIELDS.len()];
    }

    pub fn focus_previous(&mut self) {
        let index = CREATE_FIELDS
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        self.focus = CREATE_FIELDS[(index + CREATE_FIELDS.len() - 1) % CREATE_FIELDS.len()];
    }
}
