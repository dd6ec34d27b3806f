//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use societyhub_core::Section;

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        return handle_search_input(app, key);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.search_query.clear();
            app.selection = 0;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.switch_section(Section::ALL[index]);
        }
        KeyCode::Tab | KeyCode::Right => {
            app.switch_section(app.current_section.next());
        }
        KeyCode::BackTab | KeyCode::Left => {
            app.switch_section(app.current_section.prev());
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.select_last(),
        KeyCode::Char('n') => app.next_page(),
        KeyCode::Char('p') => app.prev_page(),
        KeyCode::Char('r') => app.refresh_current(),
        KeyCode::Char('c') => app.cleanup_cache(),
        KeyCode::Char('X') => app.clear_page_cache(),
        KeyCode::Esc => {
            if !app.search_query.is_empty() {
                app.search_query.clear();
                app.clamp_selection();
            } else {
                app.status_message = None;
            }
        }
        _ => {}
    }

    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            // Reset selection when search changes
            app.selection = 0;
        }
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::offline_app;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[tokio::test]
    async fn test_quit_requires_confirmation() {
        let mut app = offline_app();

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_number_keys_switch_sections() {
        let mut app = offline_app();

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_section, Section::Projects);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_section, Section::Placements);

        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_section, Section::Resources);
    }

    #[tokio::test]
    async fn test_search_mode_captures_keys() {
        let mut app = offline_app();

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Searching);

        // Digits are query text while searching, not tab switches
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('0'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search_query, "2");
        assert_eq!(app.current_section, Section::Events);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.search_query, "2");

        press(&mut app, KeyCode::Esc);
        assert!(app.search_query.is_empty());
    }

    #[tokio::test]
    async fn test_help_overlay_toggles() {
        let mut app = offline_app();

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::ShowingHelp);

        // Other keys are swallowed by the overlay
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_section, Section::Events);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_shift_x_clears_page_cache() {
        let mut app = offline_app();

        press(&mut app, KeyCode::Char('X'));
        assert_eq!(app.status_message.as_deref(), Some("Page cache already empty"));
    }
}
