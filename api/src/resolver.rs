//! Seams between the shape builder and the outside world, implemented by both
//! the HTTP client and offline snapshots.
use crate::client::{ApiError, ApiResult, BracketApi};
use crate::wire::{ApiBracketResponse, BracketSnapshot};
use crate::{Team, TeamProfile};
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// Source of raw bracket data.
#[async_trait]
pub trait BracketProvider: Send + Sync {
    async fn fetch_bracket(&self, league_id: &str) -> ApiResult<ApiBracketResponse>;
}

/// Turns a participant id into display data. Failures are recovered by the
/// [`TeamCache`], never by callers of the shape builder.
#[async_trait]
pub trait TeamResolver: Send + Sync {
    async fn resolve_team(&self, team_id: &str) -> ApiResult<TeamProfile>;
}

#[async_trait]
impl BracketProvider for BracketApi {
    async fn fetch_bracket(&self, league_id: &str) -> ApiResult<ApiBracketResponse> {
        BracketApi::fetch_bracket(self, league_id).await
    }
}

#[async_trait]
impl TeamResolver for BracketApi {
    async fn resolve_team(&self, team_id: &str) -> ApiResult<TeamProfile> {
        self.fetch_team(team_id).await
    }
}

// ---------------------------------------------------------------------------
// Snapshot source
// ---------------------------------------------------------------------------

/// Serves a bracket and its teams from a [`BracketSnapshot`]. The league id is
/// ignored; unknown team ids fail like a missing remote team.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    bracket: ApiBracketResponse,
    teams: HashMap<String, TeamProfile>,
}

impl SnapshotSource {
    pub fn new(snapshot: BracketSnapshot) -> Self {
        let teams = snapshot
            .teams
            .into_iter()
            .map(|t| (t.team_id.clone(), TeamProfile::from(t)))
            .collect();
        Self {
            bracket: snapshot.bracket,
            teams,
        }
    }

    /// Override the snapshot's format, e.g. to view the demo as single
    /// elimination.
    pub fn with_format_type(mut self, format_type: &str) -> Self {
        self.bracket.data.format_type = format_type.to_owned();
        self
    }
}

#[async_trait]
impl BracketProvider for SnapshotSource {
    async fn fetch_bracket(&self, _league_id: &str) -> ApiResult<ApiBracketResponse> {
        Ok(self.bracket.clone())
    }
}

#[async_trait]
impl TeamResolver for SnapshotSource {
    async fn resolve_team(&self, team_id: &str) -> ApiResult<TeamProfile> {
        self.teams
            .get(team_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("team {team_id} not in snapshot")))
    }
}

// ---------------------------------------------------------------------------
// TeamCache: session-wide participant cache
// ---------------------------------------------------------------------------

/// Caches resolved teams by participant id for the whole session.
///
/// Each id owns a `OnceCell`, so any number of concurrent lookups for the same
/// id share a single resolver call. Failures are cached as placeholders and
/// never retried. Entries are never evicted: team metadata is treated as
/// immutable for a session.
pub struct TeamCache {
    resolver: Arc<dyn TeamResolver>,
    entries: Mutex<HashMap<String, Arc<OnceCell<Team>>>>,
}

impl TeamCache {
    pub fn new(resolver: Arc<dyn TeamResolver>) -> Self {
        Self {
            resolver,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a participant slot. `None` is a TBD slot and never reaches the
    /// resolver.
    pub async fn team(&self, team_id: Option<&str>) -> Team {
        let Some(team_id) = team_id.filter(|id| !id.is_empty()) else {
            return Team::tbd();
        };

        let cell = self.cell_for(team_id);
        cell.get_or_init(|| self.resolve_uncached(team_id))
            .await
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_for(&self, team_id: &str) -> Arc<OnceCell<Team>> {
        self.lock_entries()
            .entry(team_id.to_owned())
            .or_default()
            .clone()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<OnceCell<Team>>>> {
        // A poisoned map only means another task panicked mid-insert; the
        // entries themselves are still valid.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn resolve_uncached(&self, team_id: &str) -> Team {
        match self.resolver.resolve_team(team_id).await {
            Ok(profile) => {
                debug!("resolved team {team_id} as {}", profile.name);
                Team::from(profile)
            }
            Err(e) => {
                warn!("Failed to resolve team {team_id}: {e}");
                Team::placeholder(unresolved_name(team_id))
            }
        }
    }
}

impl std::fmt::Debug for TeamCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamCache")
            .field("entries", &self.len())
            .finish()
    }
}

/// Display name for a participant the resolver could not find.
fn unresolved_name(team_id: &str) -> String {
    let short: String = team_id.chars().take(8).collect();
    format!("Team {short}...")
}
