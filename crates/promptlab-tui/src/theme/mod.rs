//! Centralized theme for the promptlab TUI.
//!
//! - `palette`: raw color constants
//! - `styles`: semantic style and block builders

pub mod palette;
pub mod styles;
