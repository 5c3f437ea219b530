use crate::app::root::AppRoot;
use crate::notify::Level;
use crate::ui::theme::Theme;
use crate::ui::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::fmt::Write;

const DEFAULT_TIMESTAMP: &str = "%H:%M:%S";

/// Stack of notifications in the top-right corner, newest at the bottom.
pub fn render(frame: &mut Frame, root: &AppRoot) {
    let toasts = root.services().notify.visible();
    if toasts.is_empty() {
        return;
    }

    let format = root
        .config()
        .map(|c| c.ui.timestamp_format.as_str())
        .unwrap_or(DEFAULT_TIMESTAMP);

    let area = frame.area();
    let popup_w = (area.width / 2).clamp(24, 60).min(area.width);
    let popup_h = (toasts.len() as u16 + 2).min(area.height);
    let popup_area = Rect::new(area.right().saturating_sub(popup_w), area.y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let worst = toasts.iter().map(|t| t.level).max_by_key(|l| severity(*l));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(Theme::border_type_focused())
        .border_style(worst.map(Theme::level).unwrap_or_else(Theme::border))
        .style(Style::default().bg(Theme::BG_SURFACE));
    let inner = block.inner(popup_area);

    let lines: Vec<Line> = toasts
        .iter()
        .map(|toast| {
            let mut stamp = String::new();
            // An invalid user format fails at write time, not at parse time.
            if write!(stamp, "{}", toast.created.format(format)).is_err() {
                stamp = toast.created.format(DEFAULT_TIMESTAMP).to_string();
            }
            let room = (inner.width as usize).saturating_sub(stamp.len() + 1);
            Line::from(vec![
                Span::styled(stamp, Theme::timestamp()),
                Span::raw(" "),
                Span::styled(truncate(&toast.text, room), Theme::level(toast.level)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

fn severity(level: Level) -> u8 {
    match level {
        Level::Info => 0,
        Level::Success => 1,
        Level::Warning => 2,
        Level::Error => 3,
    }
}
