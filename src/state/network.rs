use crate::state::messages::{NetworkRequest, NetworkResponse};
use bracket_api::client::{ApiError, BracketApi};
use bracket_api::resolver::{BracketProvider, TeamCache};
use bracket_api::shape;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Where brackets and teams come from for this session.
pub struct DataSource {
    pub league_id: String,
    pub provider: Arc<dyn BracketProvider>,
    /// Shared across every reload, so a team is resolved once per session.
    pub teams: Arc<TeamCache>,
    /// API client and bearer token for the tenant theme, when configured.
    pub tenant_theme: Option<(BracketApi, String)>,
}

pub struct NetworkWorker {
    source: DataSource,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        source: DataSource,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            source,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadBracket => self.handle_load_bracket().await.map_err(|err| {
                    NetworkResponse::Error {
                        message: err.to_string(),
                    }
                }),
                NetworkRequest::LoadTenantTheme => {
                    self.handle_load_tenant_theme().await.map_err(|err| {
                        warn!("tenant theme unavailable: {err}");
                        NetworkResponse::ThemeFailed {
                            message: err.to_string(),
                        }
                    })
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|failure| failure);

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_bracket(&self) -> Result<NetworkResponse, ApiError> {
        let league_id = &self.source.league_id;
        debug!("loading bracket for {league_id}");
        let raw = self.source.provider.fetch_bracket(league_id).await?;
        let bracket = shape::build_bracket(league_id, &raw.data, &self.source.teams).await;
        info!(
            "bracket {league_id} loaded: {} sections, {} teams cached",
            bracket.visible_sections().len(),
            self.source.teams.len()
        );
        Ok(NetworkResponse::BracketLoaded { bracket })
    }

    async fn handle_load_tenant_theme(&self) -> Result<NetworkResponse, ApiError> {
        let Some((api, token)) = &self.source.tenant_theme else {
            return Err(ApiError::Other("no access token configured".to_string()));
        };
        debug!("loading tenant theme from {}", api.base_url());
        let theme = api.fetch_tenant_theme(token).await?;
        Ok(NetworkResponse::ThemeLoaded { theme })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
