use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub sidebar: Rect,
    pub header: Rect,
    pub content: Rect,
    pub input_box: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    // Main vertical split: body | status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let body = main_chunks[0];
    let status_bar = main_chunks[1];

    // Horizontal: module list | gap | page
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints([
            Constraint::Length(20), // Modules
            Constraint::Min(30),    // Page
        ])
        .split(body);

    let sidebar = h_chunks[0];

    // Page: header | content | input
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Content
            Constraint::Length(3), // Input box
        ])
        .split(h_chunks[1]);

    AppLayout {
        sidebar,
        header: right_chunks[0],
        content: right_chunks[1],
        input_box: right_chunks[2],
        status_bar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fills_area() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = compute_layout(area);
        assert_eq!(layout.status_bar.y, 29);
        assert_eq!(layout.status_bar.width, 100);
        assert_eq!(layout.sidebar.width, 20);
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.input_box.height, 3);
        assert_eq!(
            layout.content.height,
            29 - layout.header.height - layout.input_box.height
        );
    }
}
