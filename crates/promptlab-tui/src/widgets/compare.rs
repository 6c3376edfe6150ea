//! Side-by-side comparison of two versions on one input

use promptlab_app::screens::{CompareFocus, CompareSlot, CompareState};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::{Paragraph, Widget, Wrap},
};

use super::results::ResultsPanel;
use super::text_field::TextField;
use crate::layout;
use crate::theme::styles;

pub struct CompareView<'a> {
    compare: &'a CompareState,
}

impl<'a> CompareView<'a> {
    pub fn new(compare: &'a CompareState) -> Self {
        Self { compare }
    }

    fn render_side(&self, slot: CompareSlot, area: Rect, buf: &mut Buffer) {
        let compare = self.compare;
        let label = compare.version_label(slot);
        let content = compare
            .slot(slot)
            .and_then(|id| compare.prompt.as_ref()?.version(id))
            .map(|v| v.content.as_str())
            .unwrap_or_default();

        let [content_area, results_area] =
            Layout::vertical([Constraint::Percentage(35), Constraint::Min(6)]).areas(area);

        let title = format!("{} · {label}", slot.label());
        Paragraph::new(Span::styled(content, styles::text_secondary()))
            .wrap(Wrap { trim: false })
            .block(styles::titled_block(&title, false))
            .render(content_area, buf);

        let result = match slot {
            CompareSlot::A => compare.result_a.as_ref(),
            CompareSlot::B => compare.result_b.as_ref(),
        };
        let results_title = format!("Output {label}");
        ResultsPanel::new(&results_title, result)
            .running(compare.running)
            .empty_hint("Press Enter to run both versions")
            .render(results_area, buf);
    }
}

impl Widget for CompareView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let compare = self.compare;
        if compare.prompt.is_none() {
            let message = if compare.loading {
                Span::styled("Loading versions…", styles::status_yellow())
            } else {
                Span::styled("Prompt could not be loaded", styles::text_muted())
            };
            Paragraph::new(message)
                .block(styles::titled_block("Compare", false))
                .render(area, buf);
            return;
        }

        let [selectors, input_area, sides] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
        ])
        .areas(area);

        let [slot_a, slot_b, model] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .areas(selectors);

        let label_a = format!("◂ {} ▸", compare.version_label(CompareSlot::A));
        let label_b = format!("◂ {} ▸", compare.version_label(CompareSlot::B));
        TextField::new("Version A", &label_a)
            .focused(compare.focus == CompareFocus::SlotA)
            .render(slot_a, buf);
        TextField::new("Version B", &label_b)
            .focused(compare.focus == CompareFocus::SlotB)
            .render(slot_b, buf);
        TextField::new("Model", &compare.model).render(model, buf);

        TextField::new("Input", &compare.input)
            .focused(compare.focus == CompareFocus::Input)
            .placeholder("Question to send to both versions")
            .render(input_area, buf);

        let (left, right) = layout::columns(sides, 50);
        self.render_side(CompareSlot::A, left, buf);
        self.render_side(CompareSlot::B, right, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_api::test_utils::sample_prompt;
    use promptlab_app::config::DefaultsSettings;
    use promptlab_core::TestRun;

    use crate::test_utils::TestTerminal;

    fn loaded() -> CompareState {
        let mut compare = CompareState::default();
        let prompt = sample_prompt(1, 3);
        compare.open(prompt.id, &DefaultsSettings::default());
        compare.apply_prompt(prompt);
        compare
    }

    #[test]
    fn test_defaults_to_latest_two_versions() {
        let mut term = TestTerminal::with_size(120, 30);
        let compare = loaded();
        term.render_widget(CompareView::new(&compare), term.area());

        assert!(term.buffer_contains("◂ v3 ▸"));
        assert!(term.buffer_contains("◂ v2 ▸"));
        assert!(term.buffer_contains("v3: answer {{question}}"));
        assert!(term.buffer_contains("v2: answer {{question}}"));
    }

    #[test]
    fn test_shows_both_outputs() {
        let mut term = TestTerminal::with_size(120, 40);
        let mut compare = loaded();
        compare.result_a = Some(TestRun {
            results: vec![promptlab_core::TestResult {
                ai_response: "left answer".into(),
                ..Default::default()
            }],
            ..Default::default()
        });
        compare.result_b = Some(TestRun {
            results: vec![promptlab_core::TestResult {
                ai_response: "right answer".into(),
                ..Default::default()
            }],
            ..Default::default()
        });
        term.render_widget(CompareView::new(&compare), term.area());

        assert!(term.buffer_contains("left answer"));
        assert!(term.buffer_contains("right answer"));
    }

    #[test]
    fn test_loading_placeholder() {
        let mut term = TestTerminal::new();
        let compare = CompareState {
            loading: true,
            ..Default::default()
        };
        term.render_widget(CompareView::new(&compare), term.area());

        assert!(term.buffer_contains("Loading versions…"));
    }
}
