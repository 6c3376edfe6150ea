//! Widget components for the TUI

mod compare;
mod create_form;
mod detail;
mod header;
mod key_hints;
mod prompt_list;
mod results;
mod settings;
mod text_field;
mod toasts;

pub use compare::CompareView;
pub use create_form::CreatePromptForm;
pub use detail::{draft_title, history_line, DetailView, InputsPanel};
pub use header::MainHeader;
pub use key_hints::{hints_for, KeyHints};
pub use prompt_list::PromptList;
pub use quick_test::{content_preview, QuickTestView};
pub use results::{format_cost, format_latency, format_quality, MetricsBar, ResultsPanel};
pub use settings::SettingsView;
pub use text_field::{visible_tail, wrapped_height, TextArea, TextField};
pub use toasts::Toasts;
