use crate::wire::{
    ApiBracketResponse, ApiTeamResponse, ApiThemeResponse, BracketSnapshot, ThemePayload,
};
use crate::TeamProfile;
use log::debug;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
const DEMO_BRACKET_JSON: &str = include_str!("../demo_bracket.json");
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tournament API client.
#[derive(Debug, Clone)]
pub struct BracketApi {
    client: Client,
    base_url: String,
}

impl Default for BracketApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl BracketApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent("bracketui/0.1 (terminal bracket viewer)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the raw bracket for a league / tournament.
    pub async fn fetch_bracket(&self, league_id: &str) -> ApiResult<ApiBracketResponse> {
        let url = format!("{}/api/v1/tournaments/{league_id}/bracket", self.base_url);
        let raw: ApiBracketResponse = self.get(&url, None).await?;
        if !raw.success {
            return Err(ApiError::Other(failure_message(
                &raw.message,
                raw.error.as_deref(),
                "bracket request was not successful",
            )));
        }
        Ok(raw)
    }

    /// Fetch display data for one participant.
    pub async fn fetch_team(&self, team_id: &str) -> ApiResult<TeamProfile> {
        let url = format!("{}/api/Team/{team_id}", self.base_url);
        let raw: ApiTeamResponse = self.get(&url, None).await?;
        if !raw.success || raw.data.team_id.is_empty() {
            return Err(ApiError::NotFound(failure_message(
                &raw.message,
                raw.error.as_deref(),
                &format!("team {team_id}"),
            )));
        }
        Ok(raw.data.into())
    }

    /// Fetch the tenant's bracket theme. Requires a bearer token.
    pub async fn fetch_tenant_theme(&self, access_token: &str) -> ApiResult<ThemePayload> {
        let url = format!("{}/api/v1/tenant/bracket-theme", self.base_url);
        let raw: ApiThemeResponse = self.get(&url, Some(access_token)).await?;
        match raw.data.theme {
            Some(theme) if raw.success => Ok(theme),
            _ => Err(ApiError::NotFound(failure_message(
                &raw.message,
                None,
                "tenant theme",
            ))),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> ApiResult<T> {
        debug!("GET {url}");
        let mut request = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_owned()));
        }

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

fn failure_message(message: &str, error: Option<&str>, fallback: &str) -> String {
    match (message.trim(), error.map(str::trim)) {
        (_, Some(err)) if !err.is_empty() => err.to_owned(),
        (msg, _) if !msg.is_empty() => msg.to_owned(),
        _ => fallback.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Offline snapshots
// ---------------------------------------------------------------------------

/// Load a bracket snapshot from a local JSON file.
pub fn load_snapshot(path: &str) -> ApiResult<BracketSnapshot> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApiError::Other(format!("could not read {path}: {e}")))?;
    parse_snapshot(&content)
        .map_err(|e| ApiError::Other(format!("invalid bracket snapshot at {path}: {e}")))
}

/// The embedded demo event: a double-elimination bracket with an upper,
/// lower and finals section.
pub fn demo_snapshot() -> ApiResult<BracketSnapshot> {
    parse_snapshot(DEMO_BRACKET_JSON)
        .map_err(|e| ApiError::Other(format!("invalid embedded demo bracket: {e}")))
}

fn parse_snapshot(content: &str) -> Result<BracketSnapshot, serde_json::Error> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRACKET_BODY: &str = r#"{
        "success": true,
        "message": "ok",
        "data": {
            "league_id": "abc",
            "format_type": "single_elim",
            "best_of_default": "bo1",
            "third_place": false,
            "bracket": {
                "upper": [
                    {"round": 1, "match_number": 1, "round_name": "Quarterfinals",
                     "participant1_id": "t1", "participant2_id": null,
                     "bracket_type": "upper", "match_type": "regular", "best_of": "bo3"}
                ],
                "lower": null,
                "finals": null
            }
        },
        "error": null
    }"#;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = BracketApi::new("https://example.test/");
        assert_eq!(api.base_url(), "https://example.test");
    }

    #[test]
    fn failure_message_prefers_error_then_message() {
        assert_eq!(failure_message("msg", Some("boom"), "fb"), "boom");
        assert_eq!(failure_message("msg", Some("  "), "fb"), "msg");
        assert_eq!(failure_message("", None, "fb"), "fb");
    }

    #[test]
    fn embedded_demo_snapshot_parses() {
        let snapshot = demo_snapshot().expect("demo bracket should parse");
        let bracket = &snapshot.bracket.data.bracket;
        assert!(!bracket.upper().is_empty());
        assert!(!bracket.lower().is_empty());
        assert!(!bracket.finals().is_empty());
        assert!(!snapshot.teams.is_empty());
    }

    #[test]
    fn unreadable_snapshot_is_a_local_error() {
        let err = load_snapshot("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ApiError::Other(_)));
        assert!(err.to_string().starts_with("Error: could not read /definitely/not/here.json"));

        // A directory exists but cannot be read as a file.
        let dir = std::env::temp_dir();
        let err = load_snapshot(dir.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ApiError::Other(_)), "{err}");
    }

    #[tokio::test]
    async fn fetch_bracket_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/tournaments/abc/bracket")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BRACKET_BODY)
            .create_async()
            .await;

        let api = BracketApi::new(&server.url());
        let raw = api.fetch_bracket("abc").await.expect("bracket should load");
        mock.assert_async().await;

        assert_eq!(raw.data.format_type, "single_elim");
        let upper = raw.data.bracket.upper();
        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].participant1_id.as_deref(), Some("t1"));
        assert!(upper[0].participant2_id.is_none());
        assert!(raw.data.bracket.lower.is_none());
    }

    #[tokio::test]
    async fn fetch_bracket_server_error_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/tournaments/abc/bracket")
            .with_status(500)
            .with_body("kaboom")
            .create_async()
            .await;

        let api = BracketApi::new(&server.url());
        let err = api.fetch_bracket("abc").await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)), "got {err}");
    }

    #[tokio::test]
    async fn fetch_bracket_unsuccessful_body_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/tournaments/abc/bracket")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": false, "message": "League not published", "error": null}"#)
            .create_async()
            .await;

        let api = BracketApi::new(&server.url());
        let err = api.fetch_bracket("abc").await.unwrap_err();
        assert_eq!(err.to_string(), "Error: League not published");
    }

    #[tokio::test]
    async fn fetch_team_maps_profile() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/Team/t1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success": true, "message": "ok",
                    "data": {"teamId": "t1", "name": "Team Liquid", "logo": "https://cdn.test/tl.png"},
                    "error": null}"#,
            )
            .create_async()
            .await;

        let api = BracketApi::new(&server.url());
        let profile = api.fetch_team("t1").await.expect("team should load");
        assert_eq!(profile.id, "t1");
        assert_eq!(profile.name, "Team Liquid");
        assert_eq!(profile.logo.as_deref(), Some("https://cdn.test/tl.png"));
    }

    #[tokio::test]
    async fn fetch_team_missing_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/Team/ghost")
            .with_status(404)
            .create_async()
            .await;

        let api = BracketApi::new(&server.url());
        let err = api.fetch_team("ghost").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn fetch_tenant_theme_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/tenant/bracket-theme")
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r##"{"success": true, "message": "ok", "data": {"theme": {
                    "colors": {"background": "#000511", "accent": "#ffb400",
                               "card": {"backgroundStart": "#111", "backgroundEnd": "#222"},
                               "text": {"primary": "#fff", "secondary": "#aaa"},
                               "line": "#444", "border": "#333",
                               "headerBackground": "#101010", "winnerBackground": "#0a3"},
                    "layout": {"matchWidth": "220px", "roundGap": "40px"}}}}"##,
            )
            .create_async()
            .await;

        let api = BracketApi::new(&server.url());
        let theme = api
            .fetch_tenant_theme("secret-token")
            .await
            .expect("theme should load");
        mock.assert_async().await;
        assert_eq!(theme.colors.accent, "#ffb400");
        assert_eq!(theme.layout.match_width, "220px");
    }
}
