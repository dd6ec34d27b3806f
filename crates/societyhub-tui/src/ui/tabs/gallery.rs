use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use societyhub_core::cache::ImageState;
use societyhub_core::utils::truncate;

use crate::app::App;
use crate::ui::styles;

use super::list;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_albums(frame, app, chunks[0]);
    render_photos(frame, app, chunks[1]);
}

fn render_albums(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.visible_items();
    let albums: Vec<ListItem> = items
        .iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::styled(item.headline.as_str(), styles::list_item_style()),
                Span::styled(format!("  {}", item.meta), styles::muted_style()),
            ]))
        })
        .collect();

    let list = List::new(albums)
        .block(
            Block::default()
                .title(list::list_title(app, items.len()))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .highlight_style(styles::selected_style());

    // ListState scrolls the selected album into view
    let mut state = ListState::default().with_selected(Some(app.selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn state_label(state: ImageState) -> &'static str {
    match state {
        ImageState::Placeholder => "thumb",
        ImageState::Loading => "loading",
        ImageState::Loaded => "full",
        ImageState::Failed => "failed",
    }
}

fn render_photos(frame: &mut Frame, app: &App, area: Rect) {
    let source_width = (area.width as usize).saturating_sub(14);

    let lines: Vec<Line> = match app.selected_item() {
        Some(album) if !album.photos.is_empty() => album
            .photos
            .iter()
            .flat_map(|photo| {
                let state = app.images.state(&photo.url);
                let source = app
                    .images
                    .display_source(&photo.url, photo.thumbnail.as_deref());
                [
                    Line::from(vec![
                        Span::styled(
                            format!(" [{:<7}] ", state_label(state)),
                            styles::image_state_style(state),
                        ),
                        Span::raw(photo.caption.clone()),
                    ]),
                    Line::from(Span::styled(
                        format!("           {}", truncate(&source, source_width)),
                        styles::muted_style(),
                    )),
                ]
            })
            .collect(),
        Some(_) => vec![Line::from(Span::styled(
            "No photos in this album",
            styles::muted_style(),
        ))],
        None => vec![Line::from(Span::styled(
            "Nothing to show",
            styles::muted_style(),
        ))],
    };

    let loaded = app.images.loaded_count();
    let block = Block::default()
        .title(format!(" Photos ({} full) ", loaded))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_selected_album_stays_visible() {
        use crate::app::offline_app;
        use ratatui::{backend::TestBackend, Terminal};
        use serde_json::json;
        use societyhub_core::Section;

        let mut app = offline_app();
        let albums: Vec<_> = (0..30)
            .map(|i| json!({"title": format!("Album {:02}", i), "photos": []}))
            .collect();
        app.seed_page(Section::Gallery, 1, json!(albums));
        app.switch_section(Section::Gallery);
        app.select_last();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| render(frame, &app, frame.area())).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Album 29"));
        assert!(!screen.contains("Album 00"));
    }

    #[test]
    fn test_state_label() {
        assert_eq!(state_label(ImageState::Placeholder), "thumb");
        assert_eq!(state_label(ImageState::Loaded), "full");
        assert_eq!(state_label(ImageState::Failed), "failed");
    }
}
