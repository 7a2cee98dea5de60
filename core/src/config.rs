//! Backend location.
//!
//! The base URL is resolved once by the caller and handed to the client, so
//! nothing downstream reads process environment.

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "NEXT_PUBLIC_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Client configuration: where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Use `base_url` verbatim, minus any trailing `/`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve from `NEXT_PUBLIC_API_URL`, falling back to the local default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve through an arbitrary key lookup. A missing or blank value
    /// falls back to `DEFAULT_BASE_URL`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(API_URL_ENV) {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path such as `/house-hold`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_uses_default() {
        let config = ApiConfig::from_lookup(|_| None);
        assert_eq!(config.base_url(), "http://localhost:3000");
    }

    #[test]
    fn blank_variable_uses_default() {
        let config = ApiConfig::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn variable_overrides_default() {
        let config = ApiConfig::from_lookup(|key| {
            assert_eq!(key, API_URL_ENV);
            Some("https://api.example.vn/".to_string())
        });
        assert_eq!(config.base_url(), "https://api.example.vn");
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ApiConfig::new("http://localhost:3000//");
        assert_eq!(config.url("/house-hold"), "http://localhost:3000/house-hold");
    }

    #[test]
    fn base_url_may_carry_a_path_prefix() {
        let config = ApiConfig::new("http://localhost:3000/api");
        assert_eq!(config.url("/admin"), "http://localhost:3000/api/admin");
    }
}
