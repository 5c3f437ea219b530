mod content;
mod header;
mod input_box;
mod layout;
mod sidebar;
mod status_bar;
mod theme;
mod toasts;

use crate::app::root::AppRoot;
use crate::app::state::AppState;
use ratatui::prelude::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(frame: &mut Frame, state: &AppState, root: &AppRoot) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);
    let services = root.services();

    sidebar::render(frame, app_layout.sidebar, services);
    header::render(frame, app_layout.header, services);
    content::render(frame, app_layout.content, state, services);
    input_box::render(frame, app_layout.input_box, state, services);
    status_bar::render(frame, app_layout.status_bar, state, root);
    toasts::render(frame, root);
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
