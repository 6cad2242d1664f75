pub mod client;
pub mod resolver;
pub mod shape;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use wire::ThemePayload;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the API wire format
// ---------------------------------------------------------------------------

/// Everything one bracket fetch produces.
#[derive(Debug, Clone, Default)]
pub struct Bracket {
    pub league_id: String,
    pub format: BracketFormat,
    /// Only built for single-elimination events.
    pub single_elimination: Option<BracketSection>,
    /// Upper + finals rounds for double-elimination events.
    pub upper: Option<BracketSection>,
    pub lower: Option<BracketSection>,
    pub finals: Option<BracketSection>,
    pub theme: Option<ThemePayload>,
}

impl Bracket {
    /// True when the fetch succeeded but produced nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.single_elimination.is_none()
            && self.upper.is_none()
            && self.lower.is_none()
            && self.finals.is_none()
    }

    /// Sections in display order for this bracket's format.
    pub fn visible_sections(&self) -> Vec<&BracketSection> {
        match self.format {
            BracketFormat::SingleElimination => self.single_elimination.iter().collect(),
            BracketFormat::DoubleElimination => {
                // Upper already carries the finals rounds.
                self.upper.iter().chain(self.lower.iter()).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketFormat {
    SingleElimination,
    #[default]
    DoubleElimination,
}

impl BracketFormat {
    pub fn from_format_type(format_type: &str) -> Self {
        if format_type == "single_elim" {
            BracketFormat::SingleElimination
        } else {
            BracketFormat::DoubleElimination
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BracketFormat::SingleElimination => "Single Elimination",
            BracketFormat::DoubleElimination => "Double Elimination",
        }
    }
}

/// Which visual panel a section represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    #[default]
    Upper,
    Lower,
    Finals,
    SingleElimination,
}

#[derive(Debug, Clone, Default)]
pub struct BracketSection {
    pub kind: SectionKind,
    pub title: String,
    /// Ascending by round id.
    pub rounds: Vec<Round>,
}

impl BracketSection {
    pub fn match_count(&self) -> usize {
        self.rounds.iter().map(|r| r.matches.len()).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Round {
    pub id: u32,
    pub name: String,
    pub best_of: u32,
    /// Ascending by match id.
    pub matches: Vec<Match>,
    pub is_finals: bool,
}

impl Round {
    pub fn best_of_label(&self) -> String {
        format!("Bo{}", self.best_of.max(1))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Match {
    /// Global match number.
    pub id: u32,
    pub team1: Team,
    pub team2: Team,
    pub status: MatchStatus,
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
}

/// One participant as it appears in one match. Each match owns its copy, so
/// score and winner state never leak between matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub score: u32,
    pub is_winner: bool,
    pub logo: Option<String>,
}

impl Team {
    pub const TBD: &'static str = "TBD";

    /// Stand-in for a slot that has no participant yet, or whose participant
    /// could not be resolved.
    pub fn placeholder(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            score: 0,
            is_winner: false,
            logo: None,
        }
    }

    pub fn tbd() -> Self {
        Self::placeholder(Self::TBD)
    }

    pub fn is_tbd(&self) -> bool {
        self.id == Self::TBD
    }
}

/// Display data for a participant, as returned by a [`resolver::TeamResolver`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamProfile {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
}

impl From<TeamProfile> for Team {
    fn from(profile: TeamProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            score: 0,
            is_winner: false,
            logo: profile.logo.filter(|l| !l.is_empty()),
        }
    }
}

impl From<wire::ApiTeamData> for TeamProfile {
    fn from(data: wire::ApiTeamData) -> Self {
        Self {
            id: data.team_id,
            name: data.name,
            logo: data.logo,
        }
    }
}
