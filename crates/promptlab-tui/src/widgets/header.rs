//! Header bar widget
//!
//! App name, breadcrumb for the current screen, and a right-aligned pill
//! that shows whether a request is in flight.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::{palette, styles};

/// Main header showing app title, breadcrumb and activity
pub struct MainHeader<'a> {
    screen: &'a str,
    context: Option<&'a str>,
    busy: bool,
    backend: Option<&'a str>,
}

impl<'a> MainHeader<'a> {
    pub fn new(screen: &'a str) -> Self {
        Self {
            screen,
            context: None,
            busy: false,
            backend: None,
        }
    }

    /// Name of the prompt the screen is about
    pub fn context(mut self, context: Option<&'a str>) -> Self {
        self.context = context;
        self
    }

    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    pub fn backend(mut self, backend: &'a str) -> Self {
        self.backend = Some(backend);
        self
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (dot, dot_style) = if self.busy {
            ("↻", styles::status_yellow().add_modifier(Modifier::BOLD))
        } else {
            ("●", styles::status_green())
        };

        let mut left_spans = vec![
            Span::raw(" "),
            Span::styled(dot, dot_style),
            Span::raw(" "),
            Span::styled("promptlab", styles::accent_bold()),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(self.screen, styles::text_secondary()),
        ];
        if let Some(context) = self.context {
            left_spans.push(Span::raw(" "));
            left_spans.push(Span::styled("/", styles::text_muted()));
            left_spans.push(Span::raw(" "));
            left_spans.push(Span::styled(context, styles::text_primary()));
        }
        let left_line = Line::from(left_spans);
        let left_width = left_line.width() as u16;
        buf.set_line(inner.x, inner.y, &left_line, inner.width);

        let pill = match (self.busy, self.backend) {
            (true, _) => Line::from(Span::styled(" working… ", styles::status_yellow())),
            (false, Some(backend)) => Line::from(Span::styled(
                format!(" {backend} "),
                styles::text_muted(),
            )),
            (false, None) => return,
        };
        let pill_width = pill.width() as u16;
        if left_width + pill_width + 2 <= inner.width {
            let x = inner.x + inner.width - pill_width;
            buf.set_line(x, inner.y, &pill, pill_width);
        }
    }
}
