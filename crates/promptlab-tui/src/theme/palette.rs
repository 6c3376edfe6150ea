//! Color palette.
//!
//! Named terminal colors only, so the UI follows the user's terminal scheme.

use ratatui::style::Color;

// --- Background layers ---
pub const DEEPEST_BG: Color = Color::Reset;
pub const CARD_BG: Color = Color::Reset;
pub const POPUP_BG: Color = Color::Black;

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::Cyan;

// --- Accent ---
pub const ACCENT: Color = Color::Cyan;
pub const CONTRAST_FG: Color = Color::Black;

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;

// --- Status ---
pub const STATUS_GREEN: Color = Color::Green;
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_YELLOW: Color = Color::Yellow;
pub const STATUS_BLUE: Color = Color::Blue;

// --- Metrics ---
pub const METRIC_LATENCY: Color = Color::Blue;
pub const METRIC_QUALITY: Color = Color::Green;
pub const METRIC_TOKENS: Color = Color::Magenta;
pub const METRIC_COST: Color = Color::Yellow;
