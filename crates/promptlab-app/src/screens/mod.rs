//! Per-screen state
//!
//! Each screen owns its own slice of `AppState`. Pure state transitions live
//! here; message dispatch and effects live in `handler`.

pub mod compare;
pub mod create;
pub mod detail;
pub mod list;
pub mod settings;

pub use compare::{CompareFocus, CompareSlot, CompareState};
pub use create::{CreatePromptState, CREATE_FIELDS};
pub use detail::{DetailFocus, DetailState};
pub use list::PromptListState;
pub use quick_test::{QuickTestEntry, QuickTestFocus, QuickTestState};
pub use settings::SettingsState;
