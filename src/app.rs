use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use bracket_api::{Bracket, ThemePayload};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use log::debug;

/// Rows scrolled per mouse wheel notch.
const WHEEL_ROWS: i32 = 3;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers: called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_bracket_loaded(&mut self, bracket: Bracket) {
        self.state.last_error = None;
        if let Some(theme) = &bracket.theme {
            self.state.theme.apply(theme);
        }
        self.state.bracket.load(bracket, &self.state.theme);
    }

    pub fn on_theme_loaded(&mut self, theme: ThemePayload) {
        self.state.theme.apply(&theme);
        self.state.bracket.relayout(&self.state.theme);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    /// The default or bracket theme stays in place; `last_error` is untouched.
    pub fn on_theme_failed(&mut self, message: &str) {
        debug!("keeping current theme: {message}");
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Scrolling: delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn scroll(&mut self, dx: i32, dy: i32) {
        self.state.bracket.scroll_by(dx, dy);
    }

    pub fn page_down(&mut self) {
        self.state.bracket.page_down();
    }

    pub fn page_up(&mut self) {
        self.state.bracket.page_up();
    }

    pub fn scroll_home(&mut self) {
        self.state.bracket.scroll_home();
    }

    pub fn scroll_end(&mut self) {
        self.state.bracket.scroll_end();
    }

    /// Wheel scrolls, left-button drag pans. Returns whether anything moved.
    pub fn on_mouse(&mut self, event: MouseEvent) -> bool {
        if self.state.active_tab != MenuItem::Bracket {
            return false;
        }
        let bracket = &mut self.state.bracket;
        match event.kind {
            MouseEventKind::ScrollDown => bracket.scroll_by(0, WHEEL_ROWS),
            MouseEventKind::ScrollUp => bracket.scroll_by(0, -WHEEL_ROWS),
            MouseEventKind::ScrollRight => bracket.scroll_by(WHEEL_ROWS, 0),
            MouseEventKind::ScrollLeft => bracket.scroll_by(-WHEEL_ROWS, 0),
            MouseEventKind::Down(MouseButton::Left) => {
                debug!("drag start at {},{}", event.column, event.row);
                bracket.begin_drag(event.column, event.row);
                return false;
            }
            MouseEventKind::Drag(MouseButton::Left) => bracket.drag_to(event.column, event.row),
            MouseEventKind::Up(MouseButton::Left) => {
                bracket.end_drag();
                return false;
            }
            _ => return false,
        }
        true
    }
}
