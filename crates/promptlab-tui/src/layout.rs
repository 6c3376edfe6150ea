//! Screen layout definitions for the TUI
//!
//! Every screen shares a header, a body and a one-row key hint footer.
//! Toasts float over the bottom-right corner of the body.

use ratatui::layout::{Constraint, Layout, Rect};

/// Header height: top border + title row + bottom border
pub const HEADER_HEIGHT: u16 = 3;

/// Widest a toast may get
pub const TOAST_MAX_WIDTH: u16 = 48;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// App title, current screen and busy indicator
    pub header: Rect,

    /// Screen content
    pub body: Rect,

    /// Key hints for the current screen
    pub footer: Rect,
}

pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}

/// Area for a stack of `count` one-line toasts in the bottom-right of `body`.
///
/// Each toast takes three rows (bordered); the stack is clipped to the body.
pub fn toast_area(body: Rect, count: usize) -> Rect {
    let width = body.width.min(TOAST_MAX_WIDTH);
    let height = (count as u16).saturating_mul(3).min(body.height);
    Rect {
        x: body.x + body.width - width,
        y: body.y + body.height - height,
        width,
        height,
    }
}

/// Split a body into a left column of `left_percent` and a right column
pub fn columns(area: Rect, left_percent: u16) -> (Rect, Rect) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(left_percent),
        Constraint::Percentage(100 - left_percent.min(100)),
    ])
    .split(area);
    (chunks[0], chunks[1])
}
