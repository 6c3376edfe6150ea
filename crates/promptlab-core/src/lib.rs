//! # promptlab-core - Core Domain Types
//!
//! Foundation crate for promptlab. Provides the prompt/version/test-run
//! domain model, error handling, client-side validation, template placeholder
//! handling and the CSV result export.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`Prompt`], [`Version`] - A prompt and its ordered, immutable versions
//! - [`TestInput`], [`TestInputs`] - Inputs for a test invocation (min length 1)
//! - [`TestRun`], [`TestResult`], [`MetricsSummary`] - Server-computed run output
//! - [`AiProvider`] - LLM provider selector
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ### Validation (`validation`)
//! - [`PromptDraft`] - Create-prompt form fields
//! - [`ValidationErrors`], [`Field`] - Per-field validation failures
//!
//! ### Templates (`template`)
//! - [`extract_variables()`] - Placeholder names used by a template
//! - [`render_template()`] - Substitute variables for a local preview
//!
//! ### Export (`export`)
//! - [`results_to_csv()`] - CSV export of a result set
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use promptlab_core::prelude::*;
//! ```

pub mod error;
pub mod export;
pub mod logging;
pub mod template;
pub mod types;
pub mod validation;

/// Prelude for common imports used throughout all promptlab crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use export::{escape_csv_field, results_to_csv, write_csv, CSV_HEADER};
pub use template::{extract_variables, render_template};
pub use types::{
    AiProvider, MetricsSummary, Prompt, PromptId, TestInput, TestInputs, TestResult, TestRun,
    TestRunId, Version, VersionId,
};
pub use validation::{
    validate_test_inputs, validate_version_content, Field, PromptDraft, ValidationErrors,
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN,
};
