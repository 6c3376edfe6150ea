//! Test run output: metric cards and per-input responses
//!
//! Shared by the detail, comparison and quick-test screens.

use promptlab_core::{MetricsSummary, TestResult, TestRun};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::theme::{palette, styles};

pub fn format_latency(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2} s", ms / 1000.0)
    } else {
        format!("{ms:.0} ms")
    }
}

pub fn format_cost(usd: f64) -> String {
    format!("${usd:.4}")
}

pub fn format_quality(score: f64) -> String {
    format!("{score:.2}")
}

/// Four metric cards in a row
pub struct MetricsBar<'a> {
    metrics: &'a MetricsSummary,
}

impl<'a> MetricsBar<'a> {
    pub fn new(metrics: &'a MetricsSummary) -> Self {
        Self { metrics }
    }
}

impl Widget for MetricsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cards = [
            (
                "Avg latency",
                format_latency(self.metrics.average_response_time_ms),
                palette::METRIC_LATENCY,
            ),
            (
                "Avg quality",
                format_quality(self.metrics.average_quality_score),
                palette::METRIC_QUALITY,
            ),
            (
                "Tokens",
                self.metrics.total_tokens.to_string(),
                palette::METRIC_TOKENS,
            ),
            (
                "Cost",
                format_cost(self.metrics.total_cost_usd),
                palette::METRIC_COST,
            ),
        ];

        let chunks = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        for ((label, value, color), chunk) in cards.into_iter().zip(chunks.iter()) {
            let block = styles::glass_block(false).title(Span::styled(label, styles::text_muted()));
            let inner = block.inner(*chunk);
            block.render(*chunk, buf);
            Paragraph::new(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .render(inner, buf);
        }
    }
}

/// Lines for one result: the question, the response and its figures
pub fn result_lines(result: &TestResult) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("▸ ", styles::accent()),
        Span::styled(result.question().to_string(), styles::accent_bold()),
    ])];
    lines.extend(
        result
            .ai_response
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), styles::text_primary()))),
    );
    lines.push(Line::from(Span::styled(
        format!(
            "{} · {} tokens · {} · quality {}",
            format_latency(result.response_time_ms as f64),
            result.token_count,
            format_cost(result.cost_usd),
            format_quality(result.quality_score),
        ),
        styles::text_muted(),
    )));
    lines.push(Line::default());
    lines
}

/// Metrics plus every result of a run, or a placeholder
pub struct ResultsPanel<'a> {
    title: &'a str,
    run: Option<&'a TestRun>,
    running: bool,
    empty_hint: &'a str,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(title: &'a str, run: Option<&'a TestRun>) -> Self {
        Self {
            title,
            run,
            running: false,
            empty_hint: "No results yet",
        }
    }

    pub fn running(mut self, running: bool) -> Self {
        self.running = running;
        self
    }

    pub fn empty_hint(mut self, hint: &'a str) -> Self {
        self.empty_hint = hint;
        self
    }
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.run {
            Some(run) if !run.model_name.is_empty() => {
                format!("{} · {} {}", self.title, run.ai_provider, run.model_name)
            }
            _ => self.title.to_string(),
        };
        let block = styles::titled_block(&title, false);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let Some(run) = self.run.filter(|_| !self.running) else {
            let (text, style) = if self.running {
                ("Running…", styles::status_yellow())
            } else {
                (self.empty_hint, styles::text_muted())
            };
            Paragraph::new(Span::styled(text, style)).render(inner, buf);
            return;
        };

        let [metrics_area, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(inner);
        MetricsBar::new(&run.metrics()).render(metrics_area, buf);

        if run.results.is_empty() {
            Paragraph::new(Span::styled(
                format!("Run finished with status {}", run.status_label()),
                styles::text_muted(),
            ))
            .render(body, buf);
            return;
        }

        let lines: Vec<Line> = run.results.iter().flat_map(result_lines).collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(body, buf);
    }
}
