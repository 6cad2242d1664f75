use crate::state::network::LoadingState;
use bracket_api::{Bracket, ThemePayload};
use crossterm::event::{KeyEvent, MouseEvent};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadBracket,
    LoadTenantTheme,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    BracketLoaded { bracket: Bracket },
    ThemeLoaded { theme: ThemePayload },
    /// Tenant theme fetch failed. Logged only, never shown in the bracket panel.
    ThemeFailed { message: String },
    /// Bracket fetch failed.
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    AppStarted,
}
