use bracket_api::{BracketSection, Match, MatchStatus, Round, Team};
use log::warn;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::widgets::Widget;

use crate::components::theme::{BracketTheme, ThemeColor};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Vertical distance between leaf matches, in terminal rows. Even, so every
/// midpoint in a power-of-two tree lands on a whole row.
pub const ROW_HEIGHT: f64 = 4.0;

/// Rows per match cell: team1 line, id/status line, team2 line.
pub const CELL_ROWS: u16 = 3;

/// Section title line plus the round header line and a spacer.
const SECTION_TITLE_ROWS: u16 = 1;
const ROUND_HEADER_ROWS: u16 = 2;
/// Blank rows between stacked sections.
const SECTION_GAP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Recursive midpoint placement with connectors.
    Binary,
    /// Matches stacked top-to-bottom per round, no connectors.
    Linear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    Empty,
    /// A round that neither halves the round before it nor continues it
    /// as a finals round.
    NotBinary {
        round: u32,
        previous: usize,
        found: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Empty => write!(f, "section has no matches"),
            LayoutError::NotBinary {
                round,
                previous,
                found,
            } => write!(
                f,
                "round {round} has {found} matches after a round of {previous}"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

// ---------------------------------------------------------------------------
// TreeLayout: binary-tree positions for one section
// ---------------------------------------------------------------------------

/// How a match joins the next round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Connector {
    /// Even-indexed sibling: owns the vertical run down to its odd sibling.
    /// `span` is `position(r, odd) - position(r, even)`.
    Pair { top: f64, span: f64 },
    /// Odd-indexed sibling, already covered by its pair's connector.
    Sibling,
    /// Feeds a continuation round laid out level with it.
    Straight { at: f64 },
}

/// Vertical placement for a strict binary bracket.
///
/// Leaf matches sit at `i * H`; every later match sits at the midpoint of its
/// two feeders `2i` and `2i + 1`. A finals round with as many matches as the
/// round before it is a continuation and sits level with its feeder.
///
/// Positions are memoized per instance, keyed by `(round_index, match_index)`.
#[derive(Debug)]
pub struct TreeLayout {
    row_height: f64,
    round_sizes: Vec<usize>,
    continuation: Vec<bool>,
    cache: RefCell<HashMap<(usize, usize), f64>>,
}

impl TreeLayout {
    /// Validate `section` as a binary tree and prepare its layout.
    pub fn new(section: &BracketSection, row_height: f64) -> Result<Self, LayoutError> {
        let shape: Vec<(u32, usize, bool)> = section
            .rounds
            .iter()
            .map(|r| (r.id, r.matches.len(), r.is_finals))
            .collect();
        Self::from_shape(&shape, row_height)
    }

    /// Plain halving tree from match counts alone, first round first.
    pub fn with_shape(round_sizes: &[usize], row_height: f64) -> Result<Self, LayoutError> {
        let shape: Vec<(u32, usize, bool)> = round_sizes
            .iter()
            .enumerate()
            .map(|(idx, count)| (idx as u32 + 1, *count, false))
            .collect();
        Self::from_shape(&shape, row_height)
    }

    fn from_shape(shape: &[(u32, usize, bool)], row_height: f64) -> Result<Self, LayoutError> {
        let Some(&(_, leaves, _)) = shape.first() else {
            return Err(LayoutError::Empty);
        };
        if leaves == 0 {
            return Err(LayoutError::Empty);
        }

        let mut continuation = vec![false; shape.len()];
        for (idx, window) in shape.windows(2).enumerate() {
            let (_, prev, _) = window[0];
            let (round, found, is_finals) = window[1];
            if found > 0 && found * 2 == prev {
                continue;
            }
            if is_finals && found == prev {
                continuation[idx + 1] = true;
                continue;
            }
            return Err(LayoutError::NotBinary {
                round,
                previous: prev,
                found,
            });
        }

        Ok(Self {
            row_height,
            round_sizes: shape.iter().map(|(_, count, _)| *count).collect(),
            continuation,
            cache: RefCell::new(HashMap::new()),
        })
    }

    pub fn round_count(&self) -> usize {
        self.round_sizes.len()
    }

    pub fn matches_in(&self, round_index: usize) -> usize {
        self.round_sizes[round_index]
    }

    /// Vertical offset of a match's cell top.
    ///
    /// Panics when either index is outside the validated shape.
    pub fn position_of(&self, round_index: usize, match_index: usize) -> f64 {
        assert!(
            round_index < self.round_sizes.len() && match_index < self.round_sizes[round_index],
            "no match {match_index} in round {round_index} of a {:?} tree",
            self.round_sizes
        );

        let key = (round_index, match_index);
        let cached = self.cache.borrow().get(&key).copied();
        if let Some(position) = cached {
            return position;
        }

        let position = if round_index == 0 {
            match_index as f64 * self.row_height
        } else if self.continuation[round_index] {
            self.position_of(round_index - 1, match_index)
        } else {
            let top = self.position_of(round_index - 1, 2 * match_index);
            let bottom = self.position_of(round_index - 1, 2 * match_index + 1);
            (top + bottom) / 2.0
        };

        self.cache.borrow_mut().insert(key, position);
        position
    }

    /// Height of the scrollable body: one row slot per leaf match.
    pub fn container_height(&self) -> f64 {
        self.round_sizes[0] as f64 * self.row_height
    }

    /// Outgoing connector for a match, `None` in the last round.
    pub fn connector(&self, round_index: usize, match_index: usize) -> Option<Connector> {
        if round_index + 1 >= self.round_sizes.len() {
            return None;
        }
        if self.continuation[round_index + 1] {
            return Some(Connector::Straight {
                at: self.position_of(round_index, match_index),
            });
        }
        if match_index % 2 == 1 {
            return Some(Connector::Sibling);
        }
        let top = self.position_of(round_index, match_index);
        let bottom = self.position_of(round_index, match_index + 1);
        Some(Connector::Pair {
            top,
            span: bottom - top,
        })
    }

    #[cfg(test)]
    fn cached_positions(&self) -> usize {
        self.cache.borrow().len()
    }
}

// ---------------------------------------------------------------------------
// SectionLayout: one drawable section
// ---------------------------------------------------------------------------

/// A built section paired with the geometry it is drawn with.
#[derive(Debug)]
pub struct SectionLayout {
    pub section: BracketSection,
    pub mode: LayoutMode,
    pub tree: Option<TreeLayout>,
    /// Set when a binary section failed validation and fell back to linear.
    pub error: Option<LayoutError>,
}

impl SectionLayout {
    pub fn new(section: BracketSection, mode: LayoutMode) -> Self {
        if mode == LayoutMode::Linear {
            return Self {
                section,
                mode,
                tree: None,
                error: None,
            };
        }

        match TreeLayout::new(&section, ROW_HEIGHT) {
            Ok(tree) => Self {
                section,
                mode,
                tree: Some(tree),
                error: None,
            },
            Err(e) => {
                warn!("{}: {e}; showing as a list", section.title);
                Self {
                    section,
                    mode: LayoutMode::Linear,
                    tree: None,
                    error: Some(e),
                }
            }
        }
    }

    pub fn title(&self) -> String {
        match &self.error {
            Some(e) => format!("{} ({e})", self.section.title),
            None => self.section.title.clone(),
        }
    }

    fn body_height(&self) -> u16 {
        match &self.tree {
            Some(tree) => tree.container_height().ceil() as u16,
            None => {
                let deepest = self
                    .section
                    .rounds
                    .iter()
                    .map(|r| r.matches.len())
                    .max()
                    .unwrap_or(0);
                (deepest as f64 * ROW_HEIGHT).ceil() as u16
            }
        }
    }

    pub fn height(&self) -> u16 {
        SECTION_TITLE_ROWS + ROUND_HEADER_ROWS + self.body_height()
    }

    pub fn width(&self, theme: &BracketTheme) -> u16 {
        let rounds = self.section.rounds.len() as u16;
        if rounds == 0 {
            return 0;
        }
        rounds * theme.match_width + (rounds - 1) * theme.round_gap
    }
}

/// Total canvas size of the stacked sections, as (width, height).
pub fn canvas_size(sections: &[SectionLayout], theme: &BracketTheme) -> (u16, u16) {
    let width = sections.iter().map(|s| s.width(theme)).max().unwrap_or(0);
    let height = sections
        .iter()
        .map(|s| s.height())
        .fold(0u16, |acc, h| acc.saturating_add(h).saturating_add(SECTION_GAP));
    (width, height.saturating_sub(SECTION_GAP))
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders stacked bracket sections on one scrollable canvas.
pub struct BracketView<'a> {
    pub sections: &'a [SectionLayout],
    pub scroll_x: u16,
    pub scroll_y: u16,
    pub theme: &'a BracketTheme,
}

/// Maps canvas coordinates to the screen, clipping to the area.
#[derive(Clone, Copy)]
struct Canvas {
    area: Rect,
    scroll_x: u16,
    scroll_y: u16,
}

impl Canvas {
    fn screen(&self, x: u16, y: u16) -> Option<(u16, u16)> {
        let rel_x = x.checked_sub(self.scroll_x)?;
        let rel_y = y.checked_sub(self.scroll_y)?;
        if rel_x >= self.area.width || rel_y >= self.area.height {
            return None;
        }
        Some((self.area.x + rel_x, self.area.y + rel_y))
    }

    fn put(&self, buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
        if let Some((sx, sy)) = self.screen(x, y)
            && let Some(cell) = buf.cell_mut((sx, sy))
        {
            cell.set_char(ch);
            cell.set_style(style);
        }
    }

    fn put_str(&self, buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style) {
        for (offset, ch) in text.chars().enumerate() {
            self.put(buf, x.saturating_add(offset as u16), y, ch, style);
        }
    }
}

impl<'a> Widget for BracketView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let canvas = Canvas {
            area,
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
        };

        let mut top = 0u16;
        for layout in self.sections {
            draw_section(layout, top, canvas, self.theme, buf);
            top = top
                .saturating_add(layout.height())
                .saturating_add(SECTION_GAP);
        }
    }
}

fn draw_section(
    layout: &SectionLayout,
    top: u16,
    canvas: Canvas,
    theme: &BracketTheme,
    buf: &mut Buffer,
) {
    let title_style = if layout.error.is_some() {
        theme.style(ThemeColor::Error)
    } else {
        theme.style(ThemeColor::Header)
    };
    canvas.put_str(buf, 0, top, &format!("── {} ──", layout.title()), title_style);

    let header_row = top.saturating_add(SECTION_TITLE_ROWS);
    let body_top = header_row.saturating_add(ROUND_HEADER_ROWS);
    let stride = theme.match_width.saturating_add(theme.round_gap);

    for (round_index, round) in layout.section.rounds.iter().enumerate() {
        let x = (round_index as u16).saturating_mul(stride);
        let header_style = if round.is_finals {
            theme.style(ThemeColor::Accent)
        } else {
            theme.style(ThemeColor::Muted)
        };
        let header = fit(&round_header(round), theme.match_width as usize);
        canvas.put_str(buf, x, header_row, &header, header_style);

        for (match_index, m) in round.matches.iter().enumerate() {
            let offset = match &layout.tree {
                Some(tree) => tree.position_of(round_index, match_index),
                None => match_index as f64 * ROW_HEIGHT,
            };
            let row = body_top.saturating_add(to_row(offset));
            draw_match_cell(m, round.is_finals, x, row, canvas, theme, buf);

            let Some(tree) = &layout.tree else {
                continue;
            };
            let conn_x = x.saturating_add(theme.match_width);
            match tree.connector(round_index, match_index) {
                Some(Connector::Pair { top, span }) => {
                    let r_top = body_top
                        .saturating_add(to_row(top))
                        .saturating_add(CELL_ROWS / 2);
                    let r_bot = r_top.saturating_add(to_row(span));
                    let r_mid = r_top + (r_bot - r_top) / 2;
                    draw_connector(r_top, r_mid, r_bot, conn_x, theme.round_gap, canvas, theme, buf);
                }
                Some(Connector::Straight { at }) => {
                    let r = body_top.saturating_add(to_row(at)).saturating_add(CELL_ROWS / 2);
                    let line = theme.style(ThemeColor::Line);
                    for dx in 0..theme.round_gap {
                        canvas.put(buf, conn_x.saturating_add(dx), r, '─', line);
                    }
                }
                Some(Connector::Sibling) | None => {}
            }
        }
    }
}

fn to_row(offset: f64) -> u16 {
    offset.round().max(0.0) as u16
}

pub fn round_header(round: &Round) -> String {
    format!("{} ({})", round.name, round.best_of_label())
}

/// Draw one match cell (3 rows) with its top at canvas row `row`.
fn draw_match_cell(
    m: &Match,
    is_finals: bool,
    x: u16,
    row: u16,
    canvas: Canvas,
    theme: &BracketTheme,
    buf: &mut Buffer,
) {
    let width = theme.match_width as usize;
    let show_scores = m.status != MatchStatus::Scheduled;

    let status_style = match m.status {
        MatchStatus::Live => theme.style(ThemeColor::Live),
        _ if is_finals => theme.style(ThemeColor::Accent),
        _ => theme.style(ThemeColor::Muted),
    };

    for (dy, team) in [(0u16, &m.team1), (CELL_ROWS - 1, &m.team2)] {
        let style = if team.is_winner {
            theme.style(ThemeColor::Winner)
        } else if team.is_tbd() {
            theme.style(ThemeColor::Muted)
        } else {
            theme.style(ThemeColor::Text)
        };
        let line = format_team_line(team, show_scores, width);
        canvas.put_str(buf, x, row.saturating_add(dy), &line, style);
    }
    let status = format_status_line(m, width);
    canvas.put_str(buf, x, row.saturating_add(CELL_ROWS / 2), &status, status_style);
}

/// Format a team line: `" [name        ] [score] "`, exactly `width` chars.
fn format_team_line(team: &Team, show_score: bool, width: usize) -> String {
    let score = if show_score {
        format!("{:>2}", team.score)
    } else {
        "  ".to_string()
    };
    let name_w = width.saturating_sub(5);
    let name: String = team.name.chars().take(name_w).collect();
    fit(&format!(" {name:<name_w$} {score} "), width)
}

/// Format the center row: match number and status.
fn format_status_line(m: &Match, width: usize) -> String {
    let status = match m.status {
        MatchStatus::Scheduled => m
            .start_time
            .map(|t| t.format("%b %d %H:%M").to_string())
            .unwrap_or_else(|| "Scheduled".to_string()),
        MatchStatus::Live => "LIVE".to_string(),
        MatchStatus::Finished => "FINAL".to_string(),
    };
    fit(&format!(" #{} {status}", m.id), width)
}

/// Pad or truncate to exactly `width` chars.
fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

/// Draw box-drawing connectors between two siblings and their parent.
///
/// ```text
///  child_top  ─┐
///              │
///  parent      ├──
///              │
///  child_bot  ─┘
/// ```
#[allow(clippy::too_many_arguments)]
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_base_x: u16,
    width: u16,
    canvas: Canvas,
    theme: &BracketTheme,
    buf: &mut Buffer,
) {
    let style = theme.style(ThemeColor::Line);
    let col_b = conn_base_x.saturating_add(width.saturating_sub(1) / 2);

    for x in conn_base_x..col_b {
        canvas.put(buf, x, r_top, '─', style);
        canvas.put(buf, x, r_bot, '─', style);
    }
    canvas.put(buf, col_b, r_top, '┐', style);
    for row in r_top.saturating_add(1)..r_bot {
        canvas.put(buf, col_b, row, '│', style);
    }
    canvas.put(buf, col_b, r_bot, '┘', style);
    canvas.put(buf, col_b, r_mid, '├', style);
    for x in col_b.saturating_add(1)..conn_base_x.saturating_add(width) {
        canvas.put(buf, x, r_mid, '─', style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_api::SectionKind;
    use tui::style::Modifier;

    fn team(name: &str) -> Team {
        Team {
            id: name.to_lowercase(),
            name: name.to_string(),
            ..Team::default()
        }
    }

    fn round(id: u32, count: usize, is_finals: bool) -> Round {
        Round {
            id,
            name: format!("Round {id}"),
            best_of: 3,
            matches: (0..count)
                .map(|i| Match {
                    id: id * 100 + i as u32,
                    team1: team("Alpha"),
                    team2: Team::tbd(),
                    ..Match::default()
                })
                .collect(),
            is_finals,
        }
    }

    fn section(rounds: Vec<Round>) -> BracketSection {
        BracketSection {
            kind: SectionKind::Upper,
            title: "Upper Bracket".to_string(),
            rounds,
        }
    }

    #[test]
    fn leaf_positions_are_multiples_of_row_height() {
        let tree = TreeLayout::with_shape(&[8, 4, 2, 1], 7.0).unwrap();
        for i in 0..8 {
            assert_eq!(tree.position_of(0, i), i as f64 * 7.0);
        }
    }

    #[test]
    fn four_leaf_tree_at_height_120() {
        let tree = TreeLayout::with_shape(&[4, 2, 1], 120.0).unwrap();
        let r0: Vec<f64> = (0..4).map(|i| tree.position_of(0, i)).collect();
        let r1: Vec<f64> = (0..2).map(|i| tree.position_of(1, i)).collect();
        assert_eq!(r0, vec![0.0, 120.0, 240.0, 360.0]);
        assert_eq!(r1, vec![60.0, 300.0]);
        assert_eq!(tree.position_of(2, 0), 180.0);
        assert_eq!(tree.container_height(), 480.0);
    }

    #[test]
    fn every_parent_sits_at_the_midpoint_of_its_children() {
        let tree = TreeLayout::with_shape(&[16, 8, 4, 2, 1], ROW_HEIGHT).unwrap();
        for r in 1..tree.round_count() {
            for i in 0..tree.matches_in(r) {
                let expected =
                    (tree.position_of(r - 1, 2 * i) + tree.position_of(r - 1, 2 * i + 1)) / 2.0;
                assert_eq!(tree.position_of(r, i), expected, "round {r} match {i}");
            }
        }
    }

    #[test]
    fn root_is_the_mean_of_all_leaves() {
        let tree = TreeLayout::with_shape(&[8, 4, 2, 1], 10.0).unwrap();
        let mean = (0..8).map(|i| tree.position_of(0, i)).sum::<f64>() / 8.0;
        assert_eq!(tree.position_of(3, 0), mean);
    }

    #[test]
    fn positions_are_memoized() {
        let tree = TreeLayout::with_shape(&[4, 2, 1], 120.0).unwrap();
        let first = tree.position_of(2, 0);
        // Resolving the root fills every coordinate beneath it.
        assert_eq!(tree.cached_positions(), 7);
        let second = tree.position_of(2, 0);
        assert_eq!(first, second);
        assert_eq!(tree.cached_positions(), 7);
    }

    #[test]
    fn separate_layouts_do_not_share_positions() {
        let wide = TreeLayout::with_shape(&[4, 2, 1], 120.0).unwrap();
        let narrow = TreeLayout::with_shape(&[2, 1], 120.0).unwrap();
        assert_eq!(wide.position_of(1, 0), 60.0);
        assert_eq!(narrow.position_of(1, 0), 60.0);
        assert_eq!(wide.position_of(2, 0), 180.0);
        assert_eq!(narrow.cached_positions(), 3);
    }

    #[test]
    fn even_row_height_keeps_positions_on_whole_rows() {
        let tree = TreeLayout::with_shape(&[32, 16, 8, 4, 2, 1], ROW_HEIGHT).unwrap();
        for r in 0..tree.round_count() {
            for i in 0..tree.matches_in(r) {
                let p = tree.position_of(r, i);
                assert_eq!(p, p.trunc(), "round {r} match {i} at {p}");
            }
        }
    }

    #[test]
    #[should_panic(expected = "no match 2 in round 1")]
    fn out_of_range_match_panics() {
        let tree = TreeLayout::with_shape(&[4, 2, 1], 120.0).unwrap();
        tree.position_of(1, 2);
    }

    #[test]
    #[should_panic]
    fn out_of_range_round_panics() {
        let tree = TreeLayout::with_shape(&[2, 1], 120.0).unwrap();
        tree.position_of(2, 0);
    }

    #[test]
    fn non_halving_round_is_rejected() {
        let err = TreeLayout::new(&section(vec![round(1, 4, false), round(2, 3, false)]), 4.0)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::NotBinary {
                round: 2,
                previous: 4,
                found: 3
            }
        );
        assert_eq!(err.to_string(), "round 2 has 3 matches after a round of 4");
    }

    #[test]
    fn equal_sized_round_is_rejected_unless_finals() {
        let plain = TreeLayout::new(&section(vec![round(1, 2, false), round(2, 2, false)]), 4.0);
        assert!(plain.is_err());

        let finals = TreeLayout::new(&section(vec![round(1, 2, false), round(2, 2, true)]), 4.0);
        assert!(finals.is_ok());
    }

    #[test]
    fn empty_section_is_rejected() {
        assert_eq!(
            TreeLayout::new(&section(vec![]), 4.0).unwrap_err(),
            LayoutError::Empty
        );
        assert_eq!(
            TreeLayout::with_shape(&[0], 4.0).unwrap_err(),
            LayoutError::Empty
        );
    }

    #[test]
    fn finals_continuation_sits_level_with_its_feeder() {
        // Upper R1 (2) -> upper final (1) -> grand final (1).
        let tree = TreeLayout::new(
            &section(vec![round(1, 2, false), round(2, 1, false), round(3, 1, true)]),
            120.0,
        )
        .unwrap();
        assert_eq!(tree.position_of(1, 0), 60.0);
        assert_eq!(tree.position_of(2, 0), 60.0);
        assert_eq!(tree.connector(1, 0), Some(Connector::Straight { at: 60.0 }));
        assert_eq!(tree.connector(2, 0), None);
    }

    #[test]
    fn halving_finals_round_uses_the_midpoint_rule() {
        let tree = TreeLayout::new(&section(vec![round(1, 2, false), round(2, 1, true)]), 120.0)
            .unwrap();
        assert_eq!(tree.position_of(1, 0), 60.0);
        assert_eq!(
            tree.connector(0, 0),
            Some(Connector::Pair {
                top: 0.0,
                span: 120.0
            })
        );
    }

    #[test]
    fn connectors_pair_siblings_and_stop_at_the_last_round() {
        let tree = TreeLayout::with_shape(&[4, 2, 1], 120.0).unwrap();
        assert_eq!(
            tree.connector(0, 2),
            Some(Connector::Pair {
                top: 240.0,
                span: 120.0
            })
        );
        assert_eq!(tree.connector(0, 3), Some(Connector::Sibling));
        assert_eq!(
            tree.connector(1, 0),
            Some(Connector::Pair {
                top: 60.0,
                span: 240.0
            })
        );
        assert_eq!(tree.connector(1, 1), Some(Connector::Sibling));
        assert_eq!(tree.connector(2, 0), None);
    }

    #[test]
    fn invalid_binary_section_falls_back_to_linear() {
        let layout = SectionLayout::new(
            section(vec![round(1, 3, false), round(2, 1, false)]),
            LayoutMode::Binary,
        );
        assert_eq!(layout.mode, LayoutMode::Linear);
        assert!(layout.tree.is_none());
        assert_eq!(
            layout.title(),
            "Upper Bracket (round 2 has 1 matches after a round of 3)"
        );
    }

    #[test]
    fn linear_section_has_no_tree() {
        let layout = SectionLayout::new(
            section(vec![round(1, 2, false), round(2, 2, false), round(3, 1, false)]),
            LayoutMode::Linear,
        );
        assert!(layout.tree.is_none());
        assert!(layout.error.is_none());
        assert_eq!(layout.height(), 1 + 2 + 8);
    }

    #[test]
    fn canvas_size_stacks_sections() {
        let theme = BracketTheme::default();
        let upper = SectionLayout::new(
            section(vec![round(1, 4, false), round(2, 2, false), round(3, 1, false)]),
            LayoutMode::Binary,
        );
        let lower = SectionLayout::new(section(vec![round(1, 2, false)]), LayoutMode::Linear);
        let upper_h = upper.height();
        let lower_h = lower.height();
        let upper_w = upper.width(&theme);

        let (w, h) = canvas_size(&[upper, lower], &theme);
        assert_eq!(w, upper_w);
        assert_eq!(w, 3 * theme.match_width + 2 * theme.round_gap);
        assert_eq!(h, upper_h + SECTION_GAP + lower_h);
    }

    #[test]
    fn team_and_status_lines_fill_the_cell_width() {
        let m = Match {
            id: 16,
            team1: team("A Very Long Team Name That Overflows"),
            team2: Team::tbd(),
            ..Match::default()
        };
        let line = format_team_line(&m.team1, true, 20);
        assert_eq!(line.chars().count(), 20, "line: {line:?}");
        let status = format_status_line(&m, 20);
        assert_eq!(status.chars().count(), 20);
        assert!(status.starts_with(" #16 Scheduled"));
    }

    fn render_cell(m: &Match, theme: &BracketTheme) -> Buffer {
        let area = Rect::new(0, 0, theme.match_width, CELL_ROWS);
        let mut buf = Buffer::empty(area);
        let canvas = Canvas {
            area,
            scroll_x: 0,
            scroll_y: 0,
        };
        draw_match_cell(m, false, 0, 0, canvas, theme, &mut buf);
        buf
    }

    fn buffer_row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn finished_match_shows_scores_and_highlights_the_winner() {
        let theme = BracketTheme::default();
        let m = Match {
            id: 7,
            team1: Team {
                score: 2,
                is_winner: true,
                ..team("Alpha")
            },
            team2: Team {
                score: 1,
                ..team("Bravo")
            },
            status: MatchStatus::Finished,
            start_time: None,
        };
        let buf = render_cell(&m, &theme);

        assert!(buffer_row(&buf, 0).contains("Alpha"));
        assert_eq!(buffer_row(&buf, 0).trim_end().chars().last(), Some('2'));
        assert!(buffer_row(&buf, 1).starts_with(" #7 FINAL"));
        assert!(buffer_row(&buf, 2).contains("Bravo"));
        assert_eq!(buffer_row(&buf, 2).trim_end().chars().last(), Some('1'));

        let winner = theme.style(ThemeColor::Winner);
        assert_eq!(buf[(1, 0)].fg, winner.fg.unwrap());
        assert!(buf[(1, 0)].modifier.contains(Modifier::BOLD));
        assert_eq!(buf[(1, 2)].fg, theme.style(ThemeColor::Text).fg.unwrap());
        assert!(!buf[(1, 2)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn live_match_shows_scores_and_live_status() {
        let theme = BracketTheme::default();
        let m = Match {
            id: 12,
            team1: Team {
                score: 1,
                ..team("Alpha")
            },
            team2: team("Bravo"),
            status: MatchStatus::Live,
            start_time: None,
        };
        let buf = render_cell(&m, &theme);

        assert!(buffer_row(&buf, 1).starts_with(" #12 LIVE"));
        assert_eq!(buf[(1, 1)].fg, theme.style(ThemeColor::Live).fg.unwrap());
        assert_eq!(buffer_row(&buf, 0).trim_end().chars().last(), Some('1'));
        assert_eq!(buffer_row(&buf, 2).trim_end().chars().last(), Some('0'));
        assert!(!buf[(1, 0)].modifier.contains(Modifier::BOLD), "no winner yet");
    }

    #[test]
    fn scheduled_match_hides_scores() {
        let line = format_team_line(&team("Alpha"), false, 22);
        assert_eq!(line.trim_end(), " Alpha");
    }

    #[test]
    fn round_header_shows_best_of() {
        assert_eq!(round_header(&round(2, 1, false)), "Round 2 (Bo3)");
    }

    #[test]
    fn view_draws_cells_and_connectors() {
        let theme = BracketTheme::default();
        let layouts = vec![SectionLayout::new(
            section(vec![round(1, 2, false), round(2, 1, false)]),
            LayoutMode::Binary,
        )];
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        BracketView {
            sections: &layouts,
            scroll_x: 0,
            scroll_y: 0,
            theme: &theme,
        }
        .render(area, &mut buf);

        // Title, headers, then the first leaf's team1 line on row 3.
        let row = |y: u16| -> String { (0..area.width).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(0).contains("Upper Bracket"));
        assert!(row(1).contains("Round 1 (Bo3)"));
        assert!(row(3).contains("Alpha"));

        // Children centers at rows 4 and 8, parent at 6.
        let col_b = theme.match_width + (theme.round_gap - 1) / 2;
        assert_eq!(buf[(col_b, 4)].symbol(), "┐");
        assert_eq!(buf[(col_b, 5)].symbol(), "│");
        assert_eq!(buf[(col_b, 6)].symbol(), "├");
        assert_eq!(buf[(col_b, 8)].symbol(), "┘");
    }

    #[test]
    fn sections_far_down_the_canvas_clip_instead_of_overflowing() {
        let theme = BracketTheme::default();
        let layout = SectionLayout::new(
            section(vec![round(1, 2, false), round(2, 1, false)]),
            LayoutMode::Binary,
        );
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        let canvas = Canvas {
            area,
            scroll_x: 0,
            scroll_y: 0,
        };
        draw_section(&layout, u16::MAX - 2, canvas, &theme, &mut buf);

        assert!((0..area.height).all(|y| buffer_row(&buf, y).trim().is_empty()));
    }

    #[test]
    fn view_respects_scroll_offsets() {
        let theme = BracketTheme::default();
        let layouts = vec![SectionLayout::new(
            section(vec![round(1, 2, false), round(2, 1, false)]),
            LayoutMode::Binary,
        )];
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        BracketView {
            sections: &layouts,
            scroll_x: 0,
            scroll_y: 3,
            theme: &theme,
        }
        .render(area, &mut buf);

        let top: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert!(top.contains("Alpha"));
        assert!(!top.contains("Upper Bracket"));
    }
}
