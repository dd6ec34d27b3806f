//! Palette keyed to what the screen reports: cache freshness, background
//! work, and image loading, on top of a small set of chrome colors.

use ratatui::style::{Color, Modifier, Style};

use societyhub_core::cache::ImageState;

use crate::app::PageFreshness;

// Chrome
const BRAND: Color = Color::Rgb(112, 96, 208);
const INK: Color = Color::Rgb(226, 226, 232);
const DIM: Color = Color::Rgb(120, 122, 134);
const SURFACE: Color = Color::Rgb(28, 28, 36);
const SELECTION: Color = Color::Rgb(52, 46, 84);
const KEY: Color = Color::Rgb(224, 184, 96);

// Cache and load states
const FRESH: Color = Color::Rgb(104, 184, 132);
const STALE: Color = Color::Rgb(220, 140, 72);
const WARMING: Color = Color::Rgb(96, 168, 216);
const BROKEN: Color = Color::Rgb(214, 84, 92);

pub fn title_style() -> Style {
    Style::default().fg(BRAND).add_modifier(Modifier::BOLD)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        title_style().add_modifier(Modifier::UNDERLINED)
    } else {
        muted_style()
    }
}

pub fn border_style(focused: bool) -> Style {
    Style::default().fg(if focused { BRAND } else { DIM })
}

pub fn muted_style() -> Style {
    Style::default().fg(DIM)
}

pub fn list_item_style() -> Style {
    Style::default().fg(INK)
}

pub fn selected_style() -> Style {
    Style::default().bg(SELECTION).add_modifier(Modifier::BOLD)
}

/// Status messages and overlay headings.
pub fn highlight_style() -> Style {
    Style::default().fg(KEY)
}

pub fn search_style() -> Style {
    Style::default().fg(KEY).add_modifier(Modifier::ITALIC)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(SURFACE).fg(INK)
}

pub fn help_key_style() -> Style {
    Style::default().fg(KEY).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    list_item_style()
}

/// Status bar text for the on-screen page.
pub fn freshness_style(freshness: PageFreshness) -> Style {
    match freshness {
        PageFreshness::Fresh => Style::default().fg(FRESH),
        PageFreshness::Stale => Style::default().fg(STALE).add_modifier(Modifier::BOLD),
        PageFreshness::Loading => Style::default().fg(WARMING),
        PageFreshness::Uncached => muted_style(),
    }
}

pub fn prefetch_style(running: bool) -> Style {
    if running {
        Style::default().fg(WARMING).add_modifier(Modifier::ITALIC)
    } else {
        muted_style()
    }
}

pub fn image_state_style(state: ImageState) -> Style {
    match state {
        ImageState::Loaded => Style::default().fg(FRESH),
        ImageState::Loading => Style::default().fg(WARMING),
        ImageState::Failed => Style::default().fg(BROKEN),
        ImageState::Placeholder => muted_style(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_stands_out_from_fresh() {
        assert_ne!(
            freshness_style(PageFreshness::Stale),
            freshness_style(PageFreshness::Fresh)
        );
        assert_eq!(freshness_style(PageFreshness::Uncached), muted_style());
    }
}
