use std::time::Duration;

use anchor::AnchorConfig;
use mapview::RenderConfig;

pub const ENV_BACKEND_URL: &str = "MEALMAP_BACKEND_URL";
pub const ENV_NOMINATIM_URL: &str = "MEALMAP_NOMINATIM_URL";
pub const ENV_USER_AGENT: &str = "MEALMAP_USER_AGENT";

/// Everything the location subsystem is allowed to assume about its
/// surroundings. Built explicitly and passed in, never read from global
/// state inside components, so tests inject fakes freely.
#[derive(Debug, Clone)]
pub struct LocationConfig {
    /// First-party geocoding proxy. `None` skips straight to the public
    /// fallback.
    pub backend_api_url: Option<String>,
    pub nominatim_url: String,
    /// Identifying client header the public fallback requires.
    pub user_agent: String,
    pub request_timeout: Duration,
    pub suggest_limit: usize,
    pub debounce: Duration,
    pub min_query_len: usize,
    /// Optional client-side spacing between public-fallback requests,
    /// beyond the debounce. Off by default.
    pub nominatim_min_interval: Option<Duration>,
    pub anchor: AnchorConfig,
    pub render: RenderConfig,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            backend_api_url: None,
            nominatim_url: geocode::nominatim::DEFAULT_BASE_URL.to_string(),
            user_agent: "mealmap/0.1".to_string(),
            request_timeout: Duration::from_secs(10),
            suggest_limit: 5,
            debounce: Duration::from_millis(500),
            min_query_len: 3,
            nominatim_min_interval: None,
            anchor: AnchorConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl LocationConfig {
    /// Defaults overridden by `MEALMAP_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            if !url.is_empty() {
                config.backend_api_url = Some(url);
            }
        }
        if let Ok(url) = std::env::var(ENV_NOMINATIM_URL) {
            if !url.is_empty() {
                config.nominatim_url = url;
            }
        }
        if let Ok(agent) = std::env::var(ENV_USER_AGENT) {
            if !agent.is_empty() {
                config.user_agent = agent;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::LocationConfig;
    use std::time::Duration;

    #[test]
    fn defaults_match_the_shipped_tuning() {
        let c = LocationConfig::default();
        assert!(c.backend_api_url.is_none());
        assert_eq!(c.debounce, Duration::from_millis(500));
        assert_eq!(c.min_query_len, 3);
        assert_eq!(c.suggest_limit, 5);
        assert!(c.nominatim_min_interval.is_none());
    }
}
