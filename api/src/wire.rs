//! Wire types for the tournament bracket API.
//! Endpoints:
//!   {base}/api/v1/tournaments/{league_id}/bracket
//!   {base}/api/Team/{team_id}
//!   {base}/api/v1/tenant/bracket-theme
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ApiBracketResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: ApiBracketData,
    pub error: Option<String>,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ApiBracketData {
    pub league_id: Option<String>,
    pub tournament_id: Option<String>,
    /// "single_elim" selects the combined layout; anything else is treated
    /// as double elimination.
    #[serde(default)]
    pub format_type: String,
    #[serde(default)]
    pub best_of_default: String,
    #[serde(default)]
    pub third_place: bool,
    #[serde(default)]
    pub bracket: ApiBrackets,
    pub theme: Option<ThemePayload>,
}

/// Each bucket is `null` on the wire when the tournament has no such bracket.
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ApiBrackets {
    pub upper: Option<Vec<ApiBracketMatch>>,
    pub lower: Option<Vec<ApiBracketMatch>>,
    pub finals: Option<Vec<ApiBracketMatch>>,
}

impl ApiBrackets {
    pub fn upper(&self) -> &[ApiBracketMatch] {
        self.upper.as_deref().unwrap_or_default()
    }

    pub fn lower(&self) -> &[ApiBracketMatch] {
        self.lower.as_deref().unwrap_or_default()
    }

    pub fn finals(&self) -> &[ApiBracketMatch] {
        self.finals.as_deref().unwrap_or_default()
    }
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ApiBracketMatch {
    pub round: u32,
    pub match_number: u32,
    #[serde(default)]
    pub league_round_id: String,
    pub round_name: Option<String>,
    pub round_description: Option<String>,
    pub round_start: Option<String>,
    pub round_end: Option<String>,
    pub participant1_id: Option<String>,
    pub participant2_id: Option<String>,
    #[serde(default)]
    pub next_match_if_win: i64,
    #[serde(default)]
    pub next_match_if_loss: i64,
    /// "upper" | "lower" | "final"
    #[serde(default)]
    pub bracket_type: String,
    #[serde(default)]
    pub match_type: String,
    /// "bo1", "bo3", ...
    #[serde(default)]
    pub best_of: String,
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ApiTeamResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: ApiTeamData,
    pub error: Option<String>,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiTeamData {
    pub team_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub logo: Option<String>,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ApiThemeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: ApiThemeData,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ApiThemeData {
    pub theme: Option<ThemePayload>,
}

/// Color and layout tokens. Colors are CSS strings ("#0b1220"), layout
/// tokens are CSS lengths ("220px").
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
pub struct ThemePayload {
    #[serde(default)]
    pub colors: ThemeColors,
    #[serde(default)]
    pub layout: ThemeLayout,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub card: ThemeCardColors,
    #[serde(default)]
    pub text: ThemeTextColors,
    #[serde(default)]
    pub accent: String,
    #[serde(default)]
    pub line: String,
    #[serde(default)]
    pub border: String,
    #[serde(default)]
    pub header_background: String,
    #[serde(default)]
    pub winner_background: String,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeCardColors {
    #[serde(default)]
    pub background_start: String,
    #[serde(default)]
    pub background_end: String,
    pub hover: Option<String>,
    pub shadow: Option<String>,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
pub struct ThemeTextColors {
    #[serde(default)]
    pub primary: String,
    #[serde(default)]
    pub secondary: String,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeLayout {
    #[serde(default)]
    pub match_width: String,
    #[serde(default)]
    pub round_gap: String,
}

// ---------------------------------------------------------------------------
// Offline snapshot
// ---------------------------------------------------------------------------

/// A bracket response bundled with the team records it references, so a
/// bracket can be viewed without the API.
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct BracketSnapshot {
    pub bracket: ApiBracketResponse,
    #[serde(default)]
    pub teams: Vec<ApiTeamData>,
}
