use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Columns scrolled per horizontal key press.
const COLUMN_STEP: i32 = 4;

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Bracket scrolling
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => guard.scroll(0, 1),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => guard.scroll(0, -1),
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.scroll(COLUMN_STEP, 0),
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.scroll(-COLUMN_STEP, 0),
        (MenuItem::Bracket, KeyCode::PageDown, _) | (MenuItem::Bracket, Char('d'), KeyModifiers::CONTROL) => {
            guard.page_down()
        }
        (MenuItem::Bracket, KeyCode::PageUp, _) | (MenuItem::Bracket, Char('u'), KeyModifiers::CONTROL) => {
            guard.page_up()
        }
        (MenuItem::Bracket, Char('g') | KeyCode::Home, _) => guard.scroll_home(),
        (MenuItem::Bracket, Char('G') | KeyCode::End, _) => guard.scroll_end(),

        // Reload
        (_, Char('r'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadBracket).await;
            return;
        }

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
