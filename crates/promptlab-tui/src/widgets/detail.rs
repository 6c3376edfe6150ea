//! Prompt detail screen
//!
//! Left column: version list and the run history of the selected version.
//! Right column: draft editor, test form and the latest results.

use promptlab_app::screens::{DetailFocus, DetailState};
use promptlab_core::{extract_variables, AiProvider, Prompt, TestInputs, TestRun, VersionId};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use super::results::{format_latency, format_quality, ResultsPanel};
use super::text_field::{TextArea, TextField};
use crate::layout;
use crate::theme::styles;

/// Most input rows shown before the list scrolls
const MAX_VISIBLE_INPUTS: usize = 5;

pub struct DetailView<'a> {
    detail: &'a DetailState,
}

impl<'a> DetailView<'a> {
    pub fn new(detail: &'a DetailState) -> Self {
        Self { detail }
    }
}

impl Widget for DetailView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let detail = self.detail;
        let Some(prompt) = detail.prompt.as_ref() else {
            let message = if detail.loading {
                Span::styled("Loading prompt…", styles::status_yellow())
            } else {
                Span::styled(
                    "Prompt could not be loaded. Press Esc to go back.",
                    styles::text_muted(),
                )
            };
            Paragraph::new(message)
                .block(styles::titled_block("Prompt", false))
                .render(area, buf);
            return;
        };

        let (left, right) = layout::columns(area, 28);
        let [versions_area, history_area] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Min(3)]).areas(left);

        VersionsPanel {
            prompt,
            selected: detail.selected_version_id,
            modified: detail.is_modified(),
            focused: detail.focus == DetailFocus::Versions,
        }
        .render(versions_area, buf);
        HistoryPanel {
            runs: &detail.history,
            loading: detail.history_loading,
        }
        .render(history_area, buf);

        let input_rows = detail.test_inputs.len().min(MAX_VISIBLE_INPUTS) as u16;
        let [draft_area, inputs_area, model_area, results_area] = Layout::vertical([
            Constraint::Percentage(35),
            Constraint::Length(input_rows + 2),
            Constraint::Length(3),
            Constraint::Min(6),
        ])
        .areas(right);

        let version_label = detail
            .selected_version()
            .map(|v| v.label())
            .unwrap_or_else(|| "-".to_string());
        let title = draft_title(&version_label, &detail.draft, detail.is_modified());
        TextArea::new(title, &detail.draft)
            .focused(detail.focus == DetailFocus::Draft)
            .placeholder("Write the prompt template; use {{question}} for the test input")
            .render(draft_area, buf);

        InputsPanel {
            inputs: &detail.test_inputs,
            cursor: detail.input_cursor,
            focused: detail.focus == DetailFocus::Inputs,
        }
        .render(inputs_area, buf);

        render_model_row(
            detail.provider,
            &detail.model,
            detail.focus == DetailFocus::Model,
            model_area,
            buf,
        );

        let results_title = format!("Results {version_label}");
        ResultsPanel::new(&results_title, detail.current_result.as_ref())
            .running(detail.testing)
            .empty_hint("No results yet. Press r to run the selected version.")
            .render(results_area, buf);
    }
}

/// `Draft v3 · modified · vars: question`
pub fn draft_title(version_label: &str, draft: &str, modified: bool) -> String {
    let mut title = format!("Draft {version_label}");
    if modified {
        title.push_str(" · modified");
    }
    let vars = extract_variables(draft);
    if !vars.is_empty() {
        title.push_str(" · vars: ");
        title.push_str(&vars.join(", "));
    }
    title
}

/// Provider selector next to the model field
pub fn render_model_row(
    provider: AiProvider,
    model: &str,
    model_focused: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let [provider_area, model_area] =
        Layout::horizontal([Constraint::Length(26), Constraint::Min(10)]).areas(area);
    TextField::new("Provider", provider.display_name()).render(provider_area, buf);
    TextField::new("Model", model)
        .focused(model_focused)
        .placeholder("e.g. gpt-4")
        .render(model_area, buf);
}

struct VersionsPanel<'a> {
    prompt: &'a Prompt,
    selected: Option<VersionId>,
    modified: bool,
    focused: bool,
}

impl Widget for VersionsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!("Versions ({})", self.prompt.versions.len());
        let block = styles::titled_block(&title, self.focused);

        if self.prompt.versions.is_empty() {
            Paragraph::new(Span::styled("No versions", styles::text_muted()))
                .block(block)
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .prompt
            .versions
            .iter()
            .map(|v| {
                let created = v
                    .created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                let marker = if self.modified && Some(v.id) == self.selected {
                    "*"
                } else {
                    " "
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<4}", v.label())),
                    Span::styled(marker, styles::status_yellow()),
                    Span::styled(format!(" {created}"), styles::text_muted()),
                ]))
            })
            .collect();

        let highlight = if self.focused {
            styles::focused_selected()
        } else {
            styles::unfocused_selected()
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("▸ ");
        let mut list_state = ListState::default()
            .with_selected(self.selected.and_then(|id| self.prompt.version_index(id)));
        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}

struct HistoryPanel<'a> {
    runs: &'a [TestRun],
    loading: bool,
}

/// One history row: when, model and headline metrics
pub fn history_line(run: &TestRun) -> Line<'static> {
    let when = run
        .started_at
        .map(|t| t.format("%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let metrics = run.metrics();
    Line::from(vec![
        Span::styled(format!("{when} "), styles::text_muted()),
        Span::raw(format!("{} ", run.model_name)),
        Span::styled(
            format!(
                "q {} · {}",
                format_quality(metrics.average_quality_score),
                format_latency(metrics.average_response_time_ms)
            ),
            styles::text_secondary(),
        ),
    ])
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!("History ({})", self.runs.len());
        let block = styles::titled_block(&title, false);

        let lines: Vec<Line> = if self.runs.is_empty() {
            let text = if self.loading {
                Span::styled("Loading…", styles::status_yellow())
            } else {
                Span::styled("No runs yet", styles::text_muted())
            };
            vec![Line::from(text)]
        } else {
            self.runs.iter().map(history_line).collect()
        };
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Numbered list of test inputs with the cursor row highlighted
pub struct InputsPanel<'a> {
    pub inputs: &'a TestInputs,
    pub cursor: usize,
    pub focused: bool,
}

impl Widget for InputsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!("Test inputs ({})", self.inputs.len());
        let block = styles::titled_block(&title, self.focused);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let visible = inner.height as usize;
        let first = (self.cursor + 1).saturating_sub(visible);
        for (row, (index, input)) in self
            .inputs
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .enumerate()
        {
            let selected = index == self.cursor;
            let number_style = if selected && self.focused {
                styles::focused_selected()
            } else if selected {
                styles::unfocused_selected()
            } else {
                styles::text_muted()
            };
            let mut spans = vec![
                Span::styled(format!("{:>2}", index + 1), number_style),
                Span::raw(" "),
            ];
            if input.question.is_empty() && !(selected && self.focused) {
                spans.push(Span::styled("question…", styles::text_muted()));
            } else {
                spans.push(Span::styled(input.question.clone(), styles::text_primary()));
            }
            if selected && self.focused {
                spans.push(Span::styled("▏", styles::accent()));
            }
            buf.set_line(inner.x, inner.y + row as u16, &Line::from(spans), inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_api::test_utils::sample_prompt;
    use promptlab_app::config::DefaultsSettings;

    use crate::test_utils::TestTerminal;

    fn loaded(versions: u32) -> DetailState {
        let mut detail = DetailState::with_defaults(&DefaultsSettings::default());
        let prompt = sample_prompt(1, versions);
        detail.open(prompt.id, &DefaultsSettings::default());
        detail.apply_prompt(prompt);
        detail
    }

    #[test]
    fn test_draft_title_lists_variables() {
        assert_eq!(
            draft_title("v2", "Answer {{question}} for {{audience}}", true),
            "Draft v2 · modified · vars: question, audience"
        );
        assert_eq!(draft_title("v1", "plain", false), "Draft v1");
    }

    #[test]
    fn test_loading_placeholder() {
        let mut term = TestTerminal::new();
        let mut detail = DetailState::default();
        detail.loading = true;
        term.render_widget(DetailView::new(&detail), term.area());

        assert!(term.buffer_contains("Loading prompt…"));
    }

    #[test]
    fn test_renders_versions_and_draft() {
        let mut term = TestTerminal::with_size(120, 40);
        let detail = loaded(2);
        term.render_widget(DetailView::new(&detail), term.area());

        assert!(term.buffer_contains("Versions (2)"));
        assert!(term.buffer_contains("▸ v2"));
        assert!(term.buffer_contains("Draft v2 · vars: question"));
        assert!(term.buffer_contains("v2: answer {{question}}"));
        assert!(term.buffer_contains("No runs yet"));
    }

    #[test]
    fn test_modified_draft_is_marked() {
        let mut term = TestTerminal::with_size(120, 40);
        let mut detail = loaded(1);
        detail.draft.push_str(" please");
        term.render_widget(DetailView::new(&detail), term.area());

        assert!(term.buffer_contains("Draft v1 · modified"));
        assert!(term.buffer_contains("v1  *"));
    }

    #[test]
    fn test_inputs_panel_scrolls_to_cursor() {
        let mut term = TestTerminal::with_size(40, 4);
        let inputs = TestInputs::from_questions(["a", "b", "c", "d"]);
        let panel = InputsPanel {
            inputs: &inputs,
            cursor: 3,
            focused: true,
        };
        term.render_widget(panel, term.area());

        assert!(term.buffer_contains(" 4 d"));
        assert!(!term.buffer_contains(" 1 a"));
    }
}
