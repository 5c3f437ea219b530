use crate::app::root::Services;
use crate::app::state::*;
use crate::language::Language;
use crate::tablegrid::{Column, SortDir, TableGrid};
use crate::ui::theme::Theme;
use crate::ui::truncate;
use crate::view::Section;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, services: &Services) {
    let focused = state.focus == Focus::Content;
    let (border_style, border_type, bg) = if focused {
        (
            Theme::border_focused(),
            Theme::border_type_focused(),
            Theme::panel_bg_focused(),
        )
    } else {
        (Theme::border(), Theme::border_type(), Theme::panel_bg())
    };

    let page = services.view.current();
    let block = Block::default()
        .title(format!(" {} ", page.title))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .style(bg);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if page.body.is_empty() {
        return;
    }

    // Text takes what it needs, the grid takes the rest.
    let constraints: Vec<Constraint> = page
        .body
        .iter()
        .map(|section| match section {
            Section::Text(text) => Constraint::Length(text.lines().count().max(1) as u16),
            Section::Grid => Constraint::Min(3),
        })
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (section, chunk) in page.body.iter().zip(chunks.iter()) {
        match section {
            Section::Text(text) => {
                let paragraph = Paragraph::new(text.as_str())
                    .style(Theme::text())
                    .wrap(Wrap { trim: false });
                frame.render_widget(paragraph, *chunk);
            }
            Section::Grid => render_grid(frame, *chunk, &services.table_grid, &services.language),
        }
    }
}

fn render_grid(frame: &mut Frame, area: Rect, grid: &TableGrid, lang: &Language) {
    let columns = grid.columns();
    if columns.is_empty() {
        return;
    }
    let paging = grid.paging();

    let header = Row::new(columns.iter().enumerate().map(|(i, column)| {
        let marker = match &paging {
            Some(p) if p.order == Some(i) => match p.dir {
                SortDir::Asc => " ▲",
                SortDir::Desc => " ▼",
            },
            _ => "",
        };
        Cell::from(format!("{}{}", column.title, marker))
    }))
    .style(Theme::table_header());

    let rows = grid.cell_rows();
    if rows.is_empty() {
        let key = if grid.is_loading() {
            "grid.loading"
        } else {
            "grid.empty"
        };
        let table = Table::new(Vec::<Row>::new(), widths(&columns)).header(header);
        let [table_area, note_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
        frame.render_widget(table, table_area);
        frame.render_widget(Paragraph::new(lang.get(key)).style(Theme::muted()), note_area);
        return;
    }

    let body: Vec<Row> = rows
        .into_iter()
        .zip(grid.row_marks())
        .map(|(cells, marked)| {
            let row = Row::new(
                cells
                    .into_iter()
                    .zip(columns.iter())
                    .map(|(text, column)| Cell::from(truncate(&text, column.width as usize))),
            );
            if marked {
                row.style(Theme::row_marked())
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(body, widths(&columns))
        .header(header)
        .column_spacing(2)
        .row_highlight_style(Theme::row_selected())
        .highlight_symbol("▸ ");
    let mut table_state = TableState::default().with_selected(Some(grid.selected()));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn widths(columns: &[Column]) -> Vec<Constraint> {
    columns.iter().map(|c| Constraint::Length(c.width)).collect()
}
