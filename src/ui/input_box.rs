use crate::app::root::Services;
use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, services: &Services) {
    let lang = &services.language;
    let focused = state.focus == Focus::Input;
    let (border_style, border_type, bg) = if focused {
        (
            Theme::border_focused(),
            Theme::border_type_focused(),
            Theme::panel_bg_focused(),
        )
    } else {
        (Theme::border(), Theme::border_type(), Theme::panel_bg())
    };

    let block = Block::default()
        .title(format!(" {} ", lang.get("input.title")))
        .title_style(if focused {
            Theme::title()
        } else {
            Theme::border()
        })
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .padding(Padding::horizontal(1))
        .style(bg);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input_text = &state.input.text;

    if focused {
        let line = if input_text.is_empty() {
            Line::from(vec![
                Span::styled("❯ ", Style::default().fg(Theme::ACCENT_TEAL)),
                Span::styled(lang.get("input.help"), Theme::muted()),
            ])
        } else {
            Line::from(vec![
                Span::styled("❯ ", Style::default().fg(Theme::ACCENT_TEAL)),
                Span::styled(input_text.as_str(), Theme::input_text()),
            ])
        };
        frame.render_widget(Paragraph::new(line), inner);

        let cursor_x = cursor_column(inner, input_text, state.input.cursor);
        frame.set_cursor_position((cursor_x, inner.y));
    } else {
        let paragraph = Paragraph::new(input_text.as_str()).style(Theme::input_text());
        frame.render_widget(paragraph, inner);
    }
}

/// Screen column of the cursor: chevron "❯ " (2 columns) plus the text
/// before it, clamped to the last column of `inner`.
fn cursor_column(inner: Rect, text: &str, cursor: usize) -> u16 {
    let before = text.get(..cursor).map_or(0, |s| s.width());
    let before = u16::try_from(before).unwrap_or(u16::MAX);
    inner
        .x
        .saturating_add(2)
        .saturating_add(before)
        .min(inner.right().saturating_sub(1))
}
