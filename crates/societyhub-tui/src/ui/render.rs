use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use societyhub_core::Section;

use crate::app::{App, AppState};

use super::styles;
use super::tabs::{gallery, list};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  SocietyHub";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, section) in Section::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, section.title()),
            styles::tab_style(*section == app.current_section),
        ));
    }

    // Search query or page indicator on the right
    let right = if matches!(app.state, AppState::Searching) || !app.search_query.is_empty() {
        Span::styled(format!("/{}", app.search_query), styles::search_style())
    } else {
        Span::styled(format!("page {}", app.page_number), styles::muted_style())
    };

    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(used + right.content.chars().count() + 2);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(right);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_section {
        Section::Gallery => gallery::render(frame, app, area),
        _ => list::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[r]efresh | [c]leanup | [q]uit";

    let mut left = match app.status_message {
        Some(ref msg) => vec![Span::styled(format!(" {} ", msg), styles::highlight_style())],
        None => vec![Span::styled(
            format!(" {} ", app.cache_status()),
            styles::freshness_style(app.page_freshness()),
        )],
    };
    if let Some(label) = app.prefetch_label() {
        left.push(Span::styled(
            format!("| {} ", label),
            styles::prefetch_style(app.is_prefetching()),
        ));
    }
    let right_text = format!(" {} ", shortcuts);

    let used: usize = left.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize)
        .saturating_sub(used)
        .saturating_sub(right_text.len());

    left.push(Span::raw(" ".repeat(padding_len)));
    left.push(Span::styled(right_text, styles::muted_style()));

    let paragraph = Paragraph::new(Line::from(left)).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  SocietyHub", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-5", "Switch section"),
        help_line("Tab/S-Tab", "Next/previous section"),
        help_line("↑/↓ j/k", "Navigate list"),
        help_line("PgUp/PgDn", "Scroll a screen"),
        help_line("n/p", "Next/previous page"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("/", "Search this page"),
        help_line("r", "Mark stale and refetch"),
        help_line("c", "Evict pages over capacity"),
        help_line("X", "Clear the page cache"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Page cache", styles::highlight_style())),
        Line::from(Span::styled(
            format!("  {}", app.cache_stats_line()),
            styles::muted_style(),
        )),
        Line::from(Span::styled(
            format!("  stored: {}", stored_sections_label(app)),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn stored_sections_label(app: &App) -> String {
    let sections = app.stored_sections();
    if sections.is_empty() {
        return "nothing yet".to_string();
    }
    sections
        .iter()
        .map(|section| section.title())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(40, 10, outer), Rect::new(30, 15, 40, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let outer = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect_fixed(40, 10, outer), Rect::new(0, 0, 20, 5));
    }
}
