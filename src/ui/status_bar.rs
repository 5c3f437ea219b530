use crate::app::root::AppRoot;
use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, root: &AppRoot) {
    let services = root.services();
    let lang = &services.language;
    let mut parts: Vec<Span> = Vec::new();

    parts.push(Span::styled(
        format!(" {} ", lang.get("app.name")),
        Style::default()
            .fg(Theme::BG_DARK)
            .bg(Theme::ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
    ));

    parts.push(Span::styled(
        format!(" {} ", services.http.base_url()),
        Theme::status_bar(),
    ));

    // Grid position
    let grid = &services.table_grid;
    if let Some(paging) = grid.paging() {
        let mut text = format!(
            "│ {} {} · {} {} ",
            lang.get("grid.page"),
            paging.page + 1,
            grid.row_count(),
            lang.get("grid.rows"),
        );
        if !paging.keyword.is_empty() {
            text.push_str(&format!("· \"{}\" ", paging.keyword));
        }
        let marked = grid.marked_count();
        if marked > 0 {
            text.push_str(&format!("· {} {} ", marked, lang.get("grid.marked")));
        }
        if grid.is_loading() {
            text.push_str("· … ");
        }
        parts.push(Span::styled(text, Theme::status_bar()));
    }

    // Focus indicator
    let focus_name = match state.focus {
        Focus::Input => "INPUT",
        Focus::Content => "PAGE",
    };
    let right = format!(" [{}] ", focus_name);

    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + right.width());
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        right,
        Style::default().fg(Theme::ACCENT_TEAL).bg(Theme::BG_ELEVATED),
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
