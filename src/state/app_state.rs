use crate::app::MenuItem;
use crate::components::bracket::{LayoutMode, SectionLayout, canvas_size};
use crate::components::theme::BracketTheme;
use bracket_api::{Bracket, SectionKind};
use chrono::{DateTime, Local};

/// Canvas distance scrolled per cell of mouse drag.
pub const DRAG_SPEED: f64 = 1.5;

// ---------------------------------------------------------------------------
// Bracket view state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    column: u16,
    row: u16,
    scroll_x: u16,
    scroll_y: u16,
}

#[derive(Debug, Default)]
pub struct BracketState {
    pub bracket: Option<Bracket>,
    /// Drawable sections in display order.
    pub sections: Vec<SectionLayout>,
    pub loaded_at: Option<DateTime<Local>>,
    pub scroll_x: u16,
    pub scroll_y: u16,
    /// Canvas (width, height) of all sections at the current theme.
    pub content: (u16, u16),
    /// Last drawn viewport (width, height).
    pub viewport: (u16, u16),
    drag: Option<DragAnchor>,
}

impl BracketState {
    /// Store a freshly built bracket. Scroll position survives reloads of the
    /// same league.
    pub fn load(&mut self, bracket: Bracket, theme: &BracketTheme) {
        let same_league = self
            .bracket
            .as_ref()
            .is_some_and(|b| b.league_id == bracket.league_id);
        if !same_league {
            self.scroll_x = 0;
            self.scroll_y = 0;
        }

        self.sections = section_layouts(&bracket);
        self.bracket = Some(bracket);
        self.loaded_at = Some(Local::now());
        self.drag = None;
        self.relayout(theme);
    }

    /// Recompute the canvas size, e.g. after a theme changed cell widths.
    pub fn relayout(&mut self, theme: &BracketTheme) {
        self.content = canvas_size(&self.sections, theme);
        self.clamp_scroll();
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        self.clamp_scroll();
    }

    /// Loaded, but nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.bracket.as_ref().is_some_and(|b| b.is_empty())
    }

    pub fn scroll_by(&mut self, dx: i32, dy: i32) {
        let (max_x, max_y) = self.max_scroll();
        self.scroll_x = offset(self.scroll_x, dx, max_x);
        self.scroll_y = offset(self.scroll_y, dy, max_y);
    }

    pub fn page_down(&mut self) {
        self.scroll_by(0, self.page_rows());
    }

    pub fn page_up(&mut self) {
        self.scroll_by(0, -self.page_rows());
    }

    pub fn scroll_home(&mut self) {
        self.scroll_x = 0;
        self.scroll_y = 0;
    }

    pub fn scroll_end(&mut self) {
        self.scroll_y = self.max_scroll().1;
    }

    pub fn begin_drag(&mut self, column: u16, row: u16) {
        self.drag = Some(DragAnchor {
            column,
            row,
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
        });
    }

    /// Move the canvas with the pointer, amplified by [`DRAG_SPEED`].
    pub fn drag_to(&mut self, column: u16, row: u16) {
        let Some(anchor) = self.drag else {
            return;
        };
        let walk_x = (f64::from(column) - f64::from(anchor.column)) * DRAG_SPEED;
        let walk_y = (f64::from(row) - f64::from(anchor.row)) * DRAG_SPEED;
        let (max_x, max_y) = self.max_scroll();
        self.scroll_x = (f64::from(anchor.scroll_x) - walk_x).clamp(0.0, f64::from(max_x)) as u16;
        self.scroll_y = (f64::from(anchor.scroll_y) - walk_y).clamp(0.0, f64::from(max_y)) as u16;
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn page_rows(&self) -> i32 {
        i32::from(self.viewport.1.saturating_sub(2).max(1))
    }

    fn max_scroll(&self) -> (u16, u16) {
        (
            self.content.0.saturating_sub(self.viewport.0),
            self.content.1.saturating_sub(self.viewport.1),
        )
    }

    fn clamp_scroll(&mut self) {
        let (max_x, max_y) = self.max_scroll();
        self.scroll_x = self.scroll_x.min(max_x);
        self.scroll_y = self.scroll_y.min(max_y);
    }
}

fn offset(current: u16, delta: i32, max: u16) -> u16 {
    (i32::from(current) + delta).clamp(0, i32::from(max)) as u16
}

/// The lower bracket is a flat list; every other visible section is a tree.
pub fn section_layouts(bracket: &Bracket) -> Vec<SectionLayout> {
    bracket
        .visible_sections()
        .into_iter()
        .map(|section| {
            let mode = match section.kind {
                SectionKind::Lower => LayoutMode::Linear,
                _ => LayoutMode::Binary,
            };
            SectionLayout::new(section.clone(), mode)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub bracket: BracketState,
    pub theme: BracketTheme,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
