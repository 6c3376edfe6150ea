//! Main render/view function (View in TEA pattern)


use promptlab_app::{AppState, UiMode};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::layout;
use crate::theme::palette;
use crate::widgets;

/// Host part of the backend URL for the header
fn backend_label(base_url: &str) -> &str {
    base_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

/// Name of the prompt the current screen is about, if any
fn context(state: &AppState) -> Option<&str> {
    let prompt = match state.ui_mode {
        UiMode::Detail => state.detail.prompt.as_ref(),
        UiMode::Compare => state.compare.prompt.as_ref(),
        _ => None,
    };
    prompt.map(|p| p.name.as_str())
}

/// Render the complete UI (View function in TEA)
///
/// Pure with respect to the model: rendering never mutates `AppState`.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area);

    let header = widgets::MainHeader::new(state.ui_mode.title())
        .context(context(state))
        .busy(state.is_busy())
        .backend(backend_label(&state.settings.api.base_url));
    frame.render_widget(header, areas.header);

    match state.ui_mode {
        UiMode::PromptList => {
            frame.render_widget(widgets::PromptList::new(&state.prompt_list), areas.body)
        }
        UiMode::Detail => frame.render_widget(widgets::DetailView::new(&state.detail), areas.body),
        UiMode::Compare => {
            frame.render_widget(widgets::CompareView::new(&state.compare), areas.body)
        }
        UiMode::QuickTest => {
            frame.render_widget(widgets::QuickTestView::new(&state.quick_test), areas.body)
        }
        UiMode::CreatePrompt => {
            frame.render_widget(widgets::CreatePromptForm::new(&state.create), areas.body)
        }
        UiMode::Settings => frame.render_widget(
            widgets::SettingsView::new(&state.settings_screen),
            areas.body,
        ),
    }

    frame.render_widget(
        widgets::KeyHints::new(widgets::hints_for(state)),
        areas.footer,
    );

    let toasts = widgets::Toasts::new(state.notifications.iter());
    if !toasts.is_empty() {
        let toast_area = layout::toast_area(areas.body, toasts.len());
        frame.render_widget(toasts, toast_area);
    }
}
