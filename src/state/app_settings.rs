use bracket_api::client::DEFAULT_BASE_URL;
use log::LevelFilter;
use std::time::Duration;

pub const ENV_API_BASE_URL: &str = "BRACKETUI_API_BASE_URL";
pub const ENV_BRACKET_JSON: &str = "BRACKETUI_BRACKET_JSON";
pub const ENV_ACCESS_TOKEN: &str = "BRACKETUI_ACCESS_TOKEN";
pub const ENV_REFRESH_SECS: &str = "BRACKETUI_REFRESH_SECS";
pub const ENV_LOG: &str = "BRACKETUI_LOG";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api_base_url: String,
    /// Local snapshot used instead of the API.
    pub bracket_json: Option<String>,
    pub access_token: Option<String>,
    /// `None` disables periodic reloads.
    pub refresh_interval: Option<Duration>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            bracket_json: None,
            access_token: None,
            refresh_interval: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let refresh_interval = get(ENV_REFRESH_SECS)
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            full_screen: false,
            log_level: get(ENV_LOG).and_then(|v| v.parse::<LevelFilter>().ok()),
            api_base_url: get(ENV_API_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            bracket_json: get(ENV_BRACKET_JSON),
            access_token: get(ENV_ACCESS_TOKEN),
            refresh_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let s = settings(&[]);
        assert_eq!(s.api_base_url, DEFAULT_BASE_URL);
        assert!(s.bracket_json.is_none());
        assert!(s.access_token.is_none());
        assert!(s.refresh_interval.is_none());
        assert!(s.log_level.is_none());
        assert!(!s.full_screen);
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            (ENV_API_BASE_URL, "https://api.example.test"),
            (ENV_BRACKET_JSON, "/tmp/bracket.json"),
            (ENV_ACCESS_TOKEN, "tok"),
            (ENV_REFRESH_SECS, "45"),
            (ENV_LOG, "debug"),
        ]);
        assert_eq!(s.api_base_url, "https://api.example.test");
        assert_eq!(s.bracket_json.as_deref(), Some("/tmp/bracket.json"));
        assert_eq!(s.access_token.as_deref(), Some("tok"));
        assert_eq!(s.refresh_interval, Some(Duration::from_secs(45)));
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn zero_or_garbage_refresh_disables_reloads() {
        assert!(settings(&[(ENV_REFRESH_SECS, "0")]).refresh_interval.is_none());
        assert!(settings(&[(ENV_REFRESH_SECS, "soon")]).refresh_interval.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let s = settings(&[(ENV_API_BASE_URL, "  "), (ENV_ACCESS_TOKEN, "")]);
        assert_eq!(s.api_base_url, DEFAULT_BASE_URL);
        assert!(s.access_token.is_none());
    }
}
