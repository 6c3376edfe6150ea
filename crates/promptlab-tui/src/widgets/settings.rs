//! API key screen

use promptlab_app::screens::SettingsState;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::text_field::TextField;
use crate::theme::styles;

pub struct SettingsView<'a> {
    screen: &'a SettingsState,
}

impl<'a> SettingsView<'a> {
    pub fn new(screen: &'a SettingsState) -> Self {
        Self { screen }
    }
}

impl Widget for SettingsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let screen = self.screen;
        let [key_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(2),
        ])
        .areas(area);

        if screen.loading {
            Paragraph::new(Span::styled("Loading stored key…", styles::status_yellow()))
                .block(styles::titled_block("Provider API key", true))
                .render(key_area, buf);
        } else {
            TextField::new("Provider API key", &screen.api_key)
                .focused(true)
                .masked(!screen.reveal)
                .render(key_area, buf);
        }

        let status = match (screen.saving, screen.has_stored_key) {
            (true, _) => Span::styled(" Saving…", styles::status_yellow()),
            (false, true) => Span::styled(" ✓ A key is stored", styles::status_green()),
            (false, false) => Span::styled(" No key stored", styles::text_muted()),
        };
        Paragraph::new(status).render(status_area, buf);

        Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                " The key is sent with every test run as X-API-KEY and forwarded to the provider.",
                styles::text_secondary(),
            )),
            Line::from(Span::styled(
                " It is stored in your user data directory, readable only by you.",
                styles::text_muted(),
            )),
        ])
        .wrap(Wrap { trim: false })
        .render(help_area, buf);
    }
}
