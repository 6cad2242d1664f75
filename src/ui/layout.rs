use tui::layout::{Constraint, Layout, Rect, Size};
pub const HEADER_HEIGHT: u16 = 3;
const LOG_PANE_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub header: [Rect; 2],
    pub main: Rect,
    /// Present while the log pane is open.
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (header, body) = if full_screen {
            ([Rect::ZERO, Rect::ZERO], area)
        } else {
            let [header, body] =
                Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Fill(1)])
                    .areas(area);
            (Self::split_header(header), body)
        };

        if !show_logs {
            return LayoutAreas { header, main: body, logs: None };
        }
        let [main, logs] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Percentage(LOG_PANE_PERCENT),
        ])
        .areas(body);
        LayoutAreas { header, main, logs: Some(logs) }
    }

    fn split_header(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}
