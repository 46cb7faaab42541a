use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_NOTIFICATION_TTL_MS: u64 = 4000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_storage_key: String,
    pub notification_ttl: Duration,
}

impl ClientConfig {
    /// Reads the build environment. The bundle is static, so these are baked in
    /// at compile time.
    pub fn from_env() -> Self {
        Self::from_values(option_env!("ESS_API_BASE_URL"), option_env!("ESS_NOTIFICATION_TTL_MS"))
    }

    fn from_values(base_url: Option<&str>, ttl_ms: Option<&str>) -> Self {
        Self {
            api_base_url: base_url
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            session_storage_key: "session_id".to_string(),
            notification_ttl: Duration::from_millis(
                ttl_ms
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_NOTIFICATION_TTL_MS),
            ),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn chat_url(&self) -> String {
        self.endpoint("chat")
    }

    pub fn login_url(&self) -> String {
        self.endpoint("auth/login")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.session_storage_key, "session_id");
        assert_eq!(config.notification_ttl, Duration::from_millis(4000));
    }

    #[test]
    fn test_endpoint_normalizes_slashes() {
        let config = ClientConfig::from_values(Some("https://hr.example.com/api/"), Some("1500"));
        assert_eq!(config.chat_url(), "https://hr.example.com/api/chat");
        assert_eq!(config.login_url(), "https://hr.example.com/api/auth/login");
        assert_eq!(config.notification_ttl, Duration::from_millis(1500));
    }

    #[test]
    fn test_bad_ttl_falls_back() {
        let config = ClientConfig::from_values(Some(""), Some("soon"));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.notification_ttl, Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS));
    }
}
