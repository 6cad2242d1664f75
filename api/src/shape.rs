//! Groups raw bracket matches into ordered rounds and sections, resolving
//! participants through the session [`TeamCache`].
use crate::resolver::TeamCache;
use crate::wire::{ApiBracketData, ApiBracketMatch};
use crate::{Bracket, BracketFormat, BracketSection, Match, MatchStatus, Round, SectionKind};
use chrono::{DateTime, Utc};
use futures_util::future::{join, join_all};
use log::warn;
use std::collections::BTreeMap;

const UPPER_TITLE: &str = "Upper Bracket";
const LOWER_TITLE: &str = "Lower Bracket";
const FINALS_TITLE: &str = "Finals";

/// Build every section the bracket's format calls for.
///
/// Single elimination builds only the combined section; any other format
/// builds upper, lower and finals concurrently.
pub async fn build_bracket(league_id: &str, data: &ApiBracketData, teams: &TeamCache) -> Bracket {
    let format = BracketFormat::from_format_type(&data.format_type);
    let mut bracket = Bracket {
        league_id: league_id.to_owned(),
        format,
        theme: data.theme.clone(),
        ..Bracket::default()
    };

    match format {
        BracketFormat::SingleElimination => {
            bracket.single_elimination = single_elimination_section(data, teams).await;
        }
        BracketFormat::DoubleElimination => {
            let (upper, lower, finals) = futures_util::join!(
                upper_bracket_section(data, teams),
                lower_bracket_section(data, teams),
                finals_section(data, teams),
            );
            bracket.upper = upper;
            bracket.lower = lower;
            bracket.finals = finals;
        }
    }

    bracket
}

/// Upper rounds followed by the finals rounds. `None` when neither has matches.
pub async fn upper_bracket_section(
    data: &ApiBracketData,
    teams: &TeamCache,
) -> Option<BracketSection> {
    combined_section(SectionKind::Upper, data, teams).await
}

/// Same combination as the upper view, for single-elimination events.
pub async fn single_elimination_section(
    data: &ApiBracketData,
    teams: &TeamCache,
) -> Option<BracketSection> {
    combined_section(SectionKind::SingleElimination, data, teams).await
}

pub async fn lower_bracket_section(
    data: &ApiBracketData,
    teams: &TeamCache,
) -> Option<BracketSection> {
    let lower = data.bracket.lower();
    if lower.is_empty() {
        return None;
    }
    Some(BracketSection {
        kind: SectionKind::Lower,
        title: LOWER_TITLE.to_owned(),
        rounds: build_rounds(lower, false, teams).await,
    })
}

pub async fn finals_section(data: &ApiBracketData, teams: &TeamCache) -> Option<BracketSection> {
    let finals = data.bracket.finals();
    if finals.is_empty() {
        return None;
    }
    Some(BracketSection {
        kind: SectionKind::Finals,
        title: FINALS_TITLE.to_owned(),
        rounds: build_rounds(finals, false, teams).await,
    })
}

async fn combined_section(
    kind: SectionKind,
    data: &ApiBracketData,
    teams: &TeamCache,
) -> Option<BracketSection> {
    let upper = data.bracket.upper();
    let finals = data.bracket.finals();
    if upper.is_empty() && finals.is_empty() {
        return None;
    }

    // Grouped separately so the finals batch is always flagged, then merged
    // back into round order.
    let (upper_rounds, finals_rounds) = join(
        build_rounds(upper, false, teams),
        build_rounds(finals, true, teams),
    )
    .await;

    let mut rounds = upper_rounds;
    rounds.extend(finals_rounds);
    rounds.sort_by_key(|r| r.id);

    Some(BracketSection {
        kind,
        title: UPPER_TITLE.to_owned(),
        rounds,
    })
}

/// Group raw matches into rounds, ascending by round id, each round's matches
/// ascending by match number.
///
/// Round metadata (best-of, name, finals flag) is read from the round's first
/// match. `mark_as_finals` flags every round regardless of bracket type.
pub async fn build_rounds(
    raw_matches: &[ApiBracketMatch],
    mark_as_finals: bool,
    teams: &TeamCache,
) -> Vec<Round> {
    let mut by_round: BTreeMap<u32, Vec<&ApiBracketMatch>> = BTreeMap::new();
    for raw in raw_matches {
        by_round.entry(raw.round).or_default().push(raw);
    }

    // BTreeMap iteration keeps rounds ascending; join_all preserves order.
    let rounds = by_round
        .into_iter()
        .map(|(number, mut matches)| async move {
            matches.sort_by_key(|m| m.match_number);
            build_round(number, &matches, mark_as_finals, teams).await
        });
    join_all(rounds).await
}

async fn build_round(
    number: u32,
    raw_matches: &[&ApiBracketMatch],
    mark_as_finals: bool,
    teams: &TeamCache,
) -> Round {
    let first = raw_matches[0];

    let best_of = parse_best_of(&first.best_of);
    if let Some(other) = raw_matches
        .iter()
        .find(|m| parse_best_of(&m.best_of) != best_of)
    {
        warn!(
            "round {number}: match {} is {} but round uses bo{best_of} from match {}",
            other.match_number, other.best_of, first.match_number
        );
    }

    let name = first
        .round_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Round {number}"));

    let is_finals = mark_as_finals || first.bracket_type == "final";

    let matches = join_all(raw_matches.iter().map(|raw| build_match(raw, teams))).await;

    Round {
        id: number,
        name,
        best_of,
        matches,
        is_finals,
    }
}

async fn build_match(raw: &ApiBracketMatch, teams: &TeamCache) -> Match {
    let (team1, team2) = join(
        teams.team(raw.participant1_id.as_deref()),
        teams.team(raw.participant2_id.as_deref()),
    )
    .await;

    Match {
        id: raw.match_number,
        team1,
        team2,
        status: MatchStatus::Scheduled,
        start_time: raw.round_start.as_deref().and_then(parse_start_time),
    }
}

/// Extract N from a "boN" string (case-insensitive, anywhere in the string).
/// Missing digits, an unparseable count or zero fall back to 1.
pub fn parse_best_of(best_of: &str) -> u32 {
    let lower = best_of.to_ascii_lowercase();
    lower
        .match_indices("bo")
        .find_map(|(idx, _)| {
            let digits: String = lower[idx + 2..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if digits.is_empty() {
                None
            } else {
                digits.parse::<u32>().ok()
            }
        })
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
