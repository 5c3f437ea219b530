use crate::app::root::Services;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, services: &Services) {
    let page = services.view.current();
    let bar = Theme::header_bar();

    let mut spans = vec![
        Span::styled(" ", bar),
        Span::styled(page.title, bar.add_modifier(Modifier::BOLD)),
    ];
    if !page.route.is_empty() {
        spans.push(Span::styled(" │ ", bar.fg(Theme::BORDER_DIM)));
        spans.push(Span::styled(page.route, bar.fg(Theme::TEXT_SECONDARY)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), area);
}
