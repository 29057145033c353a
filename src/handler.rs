use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use kundali_core::Route;

use crate::app::App;
use crate::screens::input::TextInput;
use crate::screens::{ScreenState, SendOutcome};
use crate::tui::AppEvent;

const PAGE: u16 = 10;
const WHEEL_STEP: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work on every screen
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.current_route() {
        Route::Home => handle_home(app, key),
        Route::Chatbot => handle_chat(app, key),
        Route::Kundali | Route::Planets | Route::Dasha => handle_fetch(app, key),
    }
}

/// Cursor movement and editing shared by every text field
fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) => input.insert(c),
        _ => {}
    }
}

fn handle_home(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        // Calculate Kundali
        KeyCode::Enter => app.forward(),
        _ => {
            let Some(home) = app.home_mut() else {
                return;
            };
            match key.code {
                KeyCode::Tab | KeyCode::Down => home.focus_next(),
                KeyCode::BackTab | KeyCode::Up => home.focus_prev(),
                _ => edit_text(home.focused_mut(), key),
            }
        }
    }
}

fn handle_fetch(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
            app.go_back();
        }
        // Next / Get Predictions, ignored until the data is loaded
        KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right => app.forward(),
        _ => {
            let Some(fetch) = app.fetch_mut() else {
                return;
            };
            match key.code {
                KeyCode::Char('r') => {
                    fetch.retry();
                }
                KeyCode::Char('j') | KeyCode::Down => fetch.scroll_down(1),
                KeyCode::Char('k') | KeyCode::Up => fetch.scroll_up(1),
                KeyCode::PageDown => fetch.scroll_down(PAGE),
                KeyCode::PageUp => fetch.scroll_up(PAGE),
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    fetch.scroll_down(PAGE)
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    fetch.scroll_up(PAGE)
                }
                KeyCode::Char('g') => fetch.scroll = 0,
                _ => {}
            }
        }
    }
}

fn handle_chat(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.go_back();
        return;
    }

    let Some(chat) = app.chat_mut() else {
        return;
    };
    let half_page = (chat.chat_height / 2).max(1);
    match key.code {
        KeyCode::Enter => {
            if chat.send_message() == SendOutcome::Busy {
                tracing::debug!("Still waiting for the previous reply");
            }
        }
        KeyCode::Up => chat.scroll_up(1),
        KeyCode::Down => chat.scroll_down(1),
        KeyCode::PageUp => chat.scroll_up(half_page),
        KeyCode::PageDown => chat.scroll_down(half_page),
        _ => edit_text(&mut chat.input, key),
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let up = match mouse.kind {
        MouseEventKind::ScrollUp => true,
        MouseEventKind::ScrollDown => false,
        _ => return,
    };

    match app.current_mut() {
        ScreenState::Fetch(fetch) if up => fetch.scroll_up(WHEEL_STEP),
        ScreenState::Fetch(fetch) => fetch.scroll_down(WHEEL_STEP),
        ScreenState::Chat(chat) if up => chat.scroll_up(WHEEL_STEP),
        ScreenState::Chat(chat) => chat.scroll_down(WHEEL_STEP),
        ScreenState::Home(_) => {}
    }
}
