//! Prompt list screen

use promptlab_app::screens::PromptListState;
use promptlab_core::Prompt;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

use crate::theme::styles;

pub struct PromptList<'a> {
    state: &'a PromptListState,
}

impl<'a> PromptList<'a> {
    pub fn new(state: &'a PromptListState) -> Self {
        Self { state }
    }
}

fn updated_label(prompt: &Prompt) -> String {
    prompt
        .updated_at
        .or(prompt.created_at)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn row(prompt: &Prompt) -> Row<'_> {
    let versions = match prompt.versions.len() {
        1 => "1 version".to_string(),
        n => format!("{n} versions"),
    };
    Row::new(vec![
        Line::from(prompt.name.as_str()),
        Line::from(Span::styled(
            prompt.description_or_default(),
            styles::text_secondary(),
        )),
        Line::from(Span::styled(versions, styles::text_muted())),
        Line::from(Span::styled(updated_label(prompt), styles::text_muted())),
    ])
}

impl Widget for PromptList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.state.prompts.len();
        let title = if count == 0 {
            "Prompts".to_string()
        } else {
            format!("Prompts ({count})")
        };
        let block = styles::titled_block(&title, true);

        if self.state.prompts.is_empty() {
            let message = if self.state.loading || !self.state.loaded {
                Span::styled("Loading prompts…", styles::status_yellow())
            } else {
                Span::styled(
                    "No prompts yet. Press n to create one.",
                    styles::text_muted(),
                )
            };
            Paragraph::new(message).block(block).render(area, buf);
            return;
        }

        let header = Row::new(vec!["Name", "Description", "Versions", "Updated"])
            .style(styles::text_muted())
            .bottom_margin(1);
        let table = Table::new(
            self.state.prompts.iter().map(row),
            [
                Constraint::Percentage(25),
                Constraint::Percentage(45),
                Constraint::Length(12),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .block(block)
        .column_spacing(2)
        .row_highlight_style(styles::focused_selected())
        .highlight_symbol("▸ ");

        let mut table_state = TableState::default().with_selected(Some(self.state.selected));
        StatefulWidget::render(table, area, buf, &mut table_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_api::test_utils::sample_prompt;

    use crate::test_utils::TestTerminal;

    #[test]
    fn test_empty_list_before_first_load() {
        let mut term = TestTerminal::new();
        let state = PromptListState::default();
        term.render_widget(PromptList::new(&state), term.area());

        assert!(term.buffer_contains("Loading prompts…"));
    }

    #[test]
    fn test_empty_list_after_load_invites_create() {
        let mut term = TestTerminal::new();
        let state = PromptListState {
            loaded: true,
            ..Default::default()
        };
        term.render_widget(PromptList::new(&state), term.area());

        assert!(term.buffer_contains("Press n to create one."));
    }

    #[test]
    fn test_rows_show_name_and_version_count() {
        let mut term = TestTerminal::with_size(100, 10);
        let mut state = PromptListState {
            loaded: true,
            ..Default::default()
        };
        state.set_prompts(vec![sample_prompt(1, 1), sample_prompt(2, 3)]);
        state.select_next();
        term.render_widget(PromptList::new(&state), term.area());

        assert!(term.buffer_contains("Prompts (2)"));
        assert!(term.buffer_contains("1 version"));
        assert!(term.buffer_contains("3 versions"));
        assert!(term.buffer_contains("▸ Prompt 2"));
    }
}
