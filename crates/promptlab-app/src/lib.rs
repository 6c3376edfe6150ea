//! promptlab-app - Application state and orchestration for promptlab
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management, the Engine shared by the TUI and headless runners,
//! configuration loading, and the background tasks that talk to the backend
//! and the credential store.

pub mod actions;
pub mod config;
pub mod engine;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod notification;
pub mod process;
pub mod screens;
pub mod signals;
pub mod spawn;
pub mod state;

// Re-export primary types
pub use engine::Engine;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::{Message, PromptTarget};
pub use notification::{Notification, NotificationLevel, Notifications};
pub use state::{AppPhase, AppState, UiMode};
