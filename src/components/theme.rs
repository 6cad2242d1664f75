use bracket_api::ThemePayload;
use log::debug;
use tui::style::{Color, Modifier, Style};

/// Browser pixels per terminal column when mapping layout tokens.
const PX_PER_COLUMN: f64 = 10.0;

const MATCH_WIDTH_DEFAULT: u16 = 22;
const MATCH_WIDTH_RANGE: (u16, u16) = (14, 40);
const ROUND_GAP_DEFAULT: u16 = 3;
const ROUND_GAP_RANGE: (u16, u16) = (3, 9);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeColor {
    Text,
    Muted,
    Accent,
    Header,
    Line,
    Border,
    Winner,
    Live,
    Error,
}

/// Colors and cell geometry used to draw a bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketTheme {
    pub background: Color,
    pub card: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub line: Color,
    pub border: Color,
    pub header_background: Color,
    pub winner_background: Color,
    /// Match cell width in columns.
    pub match_width: u16,
    /// Connector zone width between round columns.
    pub round_gap: u16,
}

impl Default for BracketTheme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            card: Color::Reset,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            accent: Color::Yellow,
            line: Color::Indexed(240),
            border: Color::DarkGray,
            header_background: Color::Reset,
            winner_background: Color::Reset,
            match_width: MATCH_WIDTH_DEFAULT,
            round_gap: ROUND_GAP_DEFAULT,
        }
    }
}

impl BracketTheme {
    /// Overlay a tenant theme. Tokens that do not parse keep their current
    /// value.
    pub fn apply(&mut self, payload: &ThemePayload) {
        let colors = &payload.colors;
        set_color(&mut self.background, &colors.background);
        set_color(&mut self.card, &colors.card.background_start);
        set_color(&mut self.text_primary, &colors.text.primary);
        set_color(&mut self.text_secondary, &colors.text.secondary);
        set_color(&mut self.accent, &colors.accent);
        set_color(&mut self.line, &colors.line);
        set_color(&mut self.border, &colors.border);
        set_color(&mut self.header_background, &colors.header_background);
        set_color(&mut self.winner_background, &colors.winner_background);

        if let Some(width) = px_to_columns(&payload.layout.match_width, MATCH_WIDTH_RANGE) {
            self.match_width = width;
        }
        if let Some(gap) = px_to_columns(&payload.layout.round_gap, ROUND_GAP_RANGE) {
            self.round_gap = gap;
        }
        debug!(
            "theme applied: match width {} cols, round gap {} cols",
            self.match_width, self.round_gap
        );
    }

    pub fn style(&self, color: ThemeColor) -> Style {
        let card = Style::default().bg(self.card);
        match color {
            ThemeColor::Text => card.fg(self.text_primary),
            ThemeColor::Muted => card.fg(self.text_secondary),
            ThemeColor::Accent => card.fg(self.accent).add_modifier(Modifier::BOLD),
            ThemeColor::Header => Style::default()
                .fg(self.accent)
                .bg(self.header_background)
                .add_modifier(Modifier::BOLD),
            ThemeColor::Line => Style::default().fg(self.line),
            ThemeColor::Border => Style::default().fg(self.border),
            ThemeColor::Winner if self.winner_background == Color::Reset => card
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            ThemeColor::Winner => Style::default()
                .fg(self.text_primary)
                .bg(self.winner_background)
                .add_modifier(Modifier::BOLD),
            ThemeColor::Live => card.fg(Color::Red).add_modifier(Modifier::BOLD),
            ThemeColor::Error => Style::default().fg(Color::Red),
        }
    }

    /// Whole-canvas style.
    pub fn canvas(&self) -> Style {
        Style::default().bg(self.background)
    }
}

fn set_color(slot: &mut Color, raw: &str) {
    if let Some(color) = parse_hex_color(raw) {
        *slot = color;
    }
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex_color(raw: &str) -> Option<Color> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = hex.chars().map(|c| channel(&format!("{c}{c}")));
            Some(Color::Rgb(rgb.next()??, rgb.next()??, rgb.next()??))
        }
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Map a CSS length in `px` (or a bare number) to terminal columns, clamped
/// to `range`. Other units are rejected.
pub fn px_to_columns(raw: &str, range: (u16, u16)) -> Option<u16> {
    let raw = raw.trim();
    let number = raw.strip_suffix("px").unwrap_or(raw).trim();
    let px: f64 = number.parse().ok()?;
    if !px.is_finite() || px < 0.0 {
        return None;
    }
    let columns = (px / PX_PER_COLUMN).round();
    Some((columns as u16).clamp(range.0, range.1))
}
