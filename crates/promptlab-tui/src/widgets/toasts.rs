//! Toast notifications stacked in the bottom-right corner

use promptlab_app::Notification;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget},
};

use crate::theme::{palette, styles};

pub struct Toasts<'a> {
    items: Vec<&'a Notification>,
}

impl<'a> Toasts<'a> {
    pub fn new(items: impl Iterator<Item = &'a Notification>) -> Self {
        Self {
            items: items.collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Widget for Toasts<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Newest at the bottom; drop the oldest when the stack does not fit
        let fits = (area.height / 3) as usize;
        let skip = self.items.len().saturating_sub(fits);

        for (row, toast) in self.items.into_iter().skip(skip).enumerate() {
            let rect = Rect {
                x: area.x,
                y: area.y + row as u16 * 3,
                width: area.width,
                height: 3,
            };
            let (icon, icon_style) = styles::notification_indicator(toast.level);
            let block = styles::glass_block(false)
                .border_style(icon_style)
                .style(Style::default().bg(palette::POPUP_BG));
            let inner = block.inner(rect);

            Clear.render(rect, buf);
            block.render(rect, buf);
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{icon} "), icon_style),
                Span::styled(toast.message.as_str(), styles::text_primary()),
            ]))
            .render(inner, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_app::Notifications;

    use crate::test_utils::TestTerminal;

    #[test]
    fn test_toasts_render_newest_last() {
        let mut notifications = Notifications::default();
        notifications.success("Version saved");
        notifications.error("Failed to run test: timeout");

        let mut term = TestTerminal::with_size(48, 6);
        term.render_widget(Toasts::new(notifications.iter()), term.area());

        assert!(term.line_contains(1, "Version saved"));
        assert!(term.line_contains(4, "Failed to run test"));
    }

    #[test]
    fn test_toasts_drop_oldest_when_cramped() {
        let mut notifications = Notifications::default();
        notifications.info("first");
        notifications.info("second");

        let mut term = TestTerminal::with_size(40, 3);
        term.render_widget(Toasts::new(notifications.iter()), term.area());

        assert!(term.buffer_contains("second"));
        assert!(!term.buffer_contains("first"));
    }
}
