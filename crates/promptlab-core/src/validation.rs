//! Client-side validation run before any request is issued

use std::fmt;

use crate::types::{TestInput, TestInputs};

/// Maximum prompt name length, in characters
pub const MAX_NAME_LEN: usize = 255;

/// Maximum prompt description length, in characters
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Form fields that can carry a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Prompt name on the create form
    Name,
    /// Prompt description on the create form
    Description,
    /// Initial content on the create form
    InitialContent,
    /// Draft content when saving a new version
    VersionContent,
    /// Ad-hoc content on the quick-test form
    PromptContent,
    /// The test input list
    TestInputs,
    /// Version selection (detail and comparison)
    Version,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Description => "Description",
            Field::InitialContent => "Initial content",
            Field::VersionContent => "Content",
            Field::PromptContent => "Prompt content",
            Field::TestInputs => "Test inputs",
            Field::Version => "Version",
        }
    }
}

/// Collected per-field validation failures, in the order they were found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(Field, String)>,
}

impl ValidationErrors {
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    /// Record an error; a field keeps only its first error
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field, message.into()));
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    /// Drop the error for one field (on keystroke)
    pub fn clear(&mut self, field: Field) {
        self.errors.retain(|(f, _)| *f != field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|(_, m)| m.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Fields of the create-prompt form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptDraft {
    pub name: String,
    pub description: String,
    pub initial_content: String,
}

impl PromptDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        initial_content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            initial_content: initial_content.into(),
        }
    }

    /// Check every field, collecting all failures
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.push(Field::Name, "Prompt name is required");
        } else if self.name.chars().count() > MAX_NAME_LEN {
            errors.push(
                Field::Name,
                format!("Name must be at most {MAX_NAME_LEN} characters"),
            );
        }

        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.push(
                Field::Description,
                format!("Description must be at most {MAX_DESCRIPTION_LEN} characters"),
            );
        }

        if self.initial_content.trim().is_empty() {
            errors.push(Field::InitialContent, "Initial prompt content is required");
        }

        errors.into_result()
    }
}

/// Content for a new version must not be blank
pub fn validate_version_content(content: &str) -> Result<(), ValidationErrors> {
    if content.trim().is_empty() {
        return Err(ValidationErrors::single(
            Field::VersionContent,
            "Version content cannot be empty",
        ));
    }
    Ok(())
}

/// At least one input must carry content; returns the inputs to submit
pub fn validate_test_inputs(inputs: &TestInputs) -> Result<Vec<TestInput>, ValidationErrors> {
    let submitted = inputs.non_blank();
    if submitted.is_empty() {
        return Err(ValidationErrors::single(
            Field::TestInputs,
            "Enter at least one test input",
        ));
    }
    Ok(submitted)
}
