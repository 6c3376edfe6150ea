//! New prompt form with inline validation errors

use promptlab_app::screens::CreatePromptState;
use promptlab_core::{Field, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::{Paragraph, Widget},
};

use super::text_field::{TextArea, TextField};
use crate::theme::styles;

pub struct CreatePromptForm<'a> {
    form: &'a CreatePromptState,
}

impl<'a> CreatePromptForm<'a> {
    pub fn new(form: &'a CreatePromptState) -> Self {
        Self { form }
    }
}

impl Widget for CreatePromptForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let form = self.form;
        let [name_area, description_area, content_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        let name_label = format!(
            "Name ({}/{MAX_NAME_LEN})",
            form.draft.name.chars().count()
        );
        TextField::new(&name_label, &form.draft.name)
            .focused(form.focus == Field::Name)
            .placeholder("e.g. Customer support reply")
            .error(form.errors.get(Field::Name))
            .render(name_area, buf);

        let description_label = format!(
            "Description ({}/{MAX_DESCRIPTION_LEN})",
            form.draft.description.chars().count()
        );
        TextField::new(&description_label, &form.draft.description)
            .focused(form.focus == Field::Description)
            .placeholder("Optional")
            .error(form.errors.get(Field::Description))
            .render(description_area, buf);

        TextArea::new("Initial content", &form.draft.initial_content)
            .focused(form.focus == Field::InitialContent)
            .placeholder("Template for version 1, e.g. Answer: {{question}}")
            .error(form.errors.get(Field::InitialContent))
            .render(content_area, buf);

        let status = if form.submitting {
            Span::styled(" Creating prompt…", styles::status_yellow())
        } else if !form.errors.is_empty() {
            Span::styled(
                format!(" {} field(s) need attention", form.errors.len()),
                styles::status_red(),
            )
        } else {
            Span::styled(" Ctrl+S to create", styles::text_muted())
        };
        Paragraph::new(status).render(status_area, buf);
    }
}
