use crate::app::root::Services;
use crate::loader::Route;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem};

pub fn render(frame: &mut Frame, area: Rect, services: &Services) {
    let lang = &services.language;
    let block = Block::default()
        .title(format!(" {} ", lang.get("nav.modules")))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border())
        .style(Theme::panel_bg());

    let active = Route::parse(&services.view.current().route).map(|r| r.module);

    let items: Vec<ListItem> = services
        .modules
        .iter()
        .enumerate()
        .map(|(i, module)| {
            let is_active = active.as_deref() == Some(module.name());
            let style = if is_active {
                Theme::module_active()
            } else {
                Theme::module_normal()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" F{} ", i + 1), Theme::muted()),
                Span::styled(lang.get(module.title_key()).to_string(), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
