use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use societyhub_core::models::ItemSummary;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_item_list(frame, app, chunks[0]);
    render_item_detail(frame, app.selected_item(), chunks[1]);
}

/// Block title shared by every section list.
pub fn list_title(app: &App, shown: usize) -> String {
    let mut title = format!(" {} ({}) ", app.current_section.title(), app.view.count);
    if shown != app.view.items.len() {
        title.push_str(&format!("- {} match ", shown));
    }
    if app.loading {
        title.push_str("- loading ");
    }
    title
}

fn render_item_list(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new([Cell::from("Name"), Cell::from("Info")])
        .style(styles::title_style())
        .height(1);

    let items = app.visible_items();

    let rows: Vec<Row> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(item.headline.as_str()),
                Cell::from(item.meta.as_str()),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Percentage(55), Constraint::Fill(1)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(list_title(app, items.len()))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_item_detail(frame: &mut Frame, selected: Option<&ItemSummary>, area: Rect) {
    let content = match selected {
        Some(item) => {
            let mut lines = vec![
                Line::from(Span::styled(item.headline.as_str(), styles::title_style())),
                Line::from(Span::styled(item.meta.as_str(), styles::muted_style())),
                Line::from(""),
            ];

            for (label, value) in &item.details {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<10}", label), styles::muted_style()),
                    Span::raw(value.as_str()),
                ]));
            }

            if let Some(ref description) = item.description {
                lines.push(Line::from(""));
                lines.push(Line::from(description.as_str()));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "Nothing to show",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
