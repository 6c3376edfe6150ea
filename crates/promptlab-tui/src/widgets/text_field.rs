//! Single-line and multi-line text inputs
//!
//! Editing happens in the reducer; these widgets only draw a value with a
//! trailing cursor when focused. Values longer than the field show their
//! tail so the cursor stays visible.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::styles;

const CURSOR: &str = "▏";

/// Longest suffix of `value` that fits in `width` terminal columns
pub fn visible_tail(value: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = value.len();
    for (index, ch) in value.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = index;
    }
    &value[start..]
}

/// Rows `text` occupies when wrapped at `width` columns (approximate: char wrap)
pub fn wrapped_height(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let width = width as usize;
    let rows: usize = text
        .split('\n')
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    rows.min(u16::MAX as usize) as u16
}

/// Bordered one-line input
pub struct TextField<'a> {
    label: &'a str,
    value: &'a str,
    focused: bool,
    placeholder: &'a str,
    error: Option<&'a str>,
    masked: bool,
}

impl<'a> TextField<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            focused: false,
            placeholder: "",
            error: None,
            masked: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// Show one bullet per character instead of the value
    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }
}

impl Widget for TextField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = field_block(self.label, self.focused, self.error);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let line = if self.value.is_empty() && !self.focused {
            Line::from(Span::styled(self.placeholder, styles::text_muted()))
        } else {
            let shown = if self.masked {
                "•".repeat(self.value.chars().count())
            } else {
                self.value.to_string()
            };
            let room = (inner.width as usize).saturating_sub(usize::from(self.focused));
            let mut spans = vec![Span::styled(
                visible_tail(&shown, room).to_string(),
                styles::text_primary(),
            )];
            if self.focused {
                spans.push(Span::styled(CURSOR, styles::accent()));
            }
            Line::from(spans)
        };
        Paragraph::new(line).render(inner, buf);
    }
}

/// Bordered multi-line editor that keeps its last line in view
pub struct TextArea<'a> {
    label: String,
    value: &'a str,
    focused: bool,
    placeholder: &'a str,
    error: Option<&'a str>,
}

impl<'a> TextArea<'a> {
    pub fn new(label: impl Into<String>, value: &'a str) -> Self {
        Self {
            label: label.into(),
            value,
            focused: false,
            placeholder: "",
            error: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Widget for TextArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = field_block(&self.label, self.focused, self.error);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.value.is_empty() && !self.focused {
            Paragraph::new(Span::styled(self.placeholder, styles::text_muted()))
                .wrap(Wrap { trim: false })
                .render(inner, buf);
            return;
        }

        let mut lines: Vec<Line> = self
            .value
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), styles::text_primary())))
            .collect();
        if self.focused {
            if let Some(last) = lines.last_mut() {
                last.push_span(Span::styled(CURSOR, styles::accent()));
            }
        }

        let height = wrapped_height(self.value, inner.width);
        let scroll = height.saturating_sub(inner.height);
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(inner, buf);
    }
}

fn field_block<'a>(label: &'a str, focused: bool, error: Option<&'a str>) -> Block<'a> {
    let block = styles::titled_block(label, focused);
    match error {
        Some(message) => block
            .border_style(styles::status_red())
            .title_bottom(Line::from(Span::styled(
                format!(" {message} "),
                styles::status_red(),
            ))),
        None => block,
    }
}
