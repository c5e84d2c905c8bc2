//! API location resolution.
//!
//! The API root defaults to `/api`, the path a browser front-end reaches
//! through its dev-server proxy. Hosts that are not served from the API's
//! origin resolve that relative root against `origin`.

use std::env;

pub const API_BASE_VAR: &str = "TODO_API_BASE";
pub const API_ORIGIN_VAR: &str = "TODO_API_ORIGIN";

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub origin: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Used by `from_env` and by tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = lookup(API_BASE_VAR)
            .map(|v| strip_one_slash(&v))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let origin = lookup(API_ORIGIN_VAR)
            .map(|v| strip_one_slash(&v))
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
        Self { api_base, origin }
    }

    /// Replace the API root, stripping one trailing slash as the env
    /// override does.
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = strip_one_slash(api_base);
        self
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = strip_one_slash(origin);
        self
    }

    /// Absolute API root. An `api_base` that already carries a scheme is
    /// returned as is.
    pub fn base_url(&self) -> String {
        if self.api_base.contains("://") {
            return self.api_base.clone();
        }
        if self.api_base.starts_with('/') || self.api_base.is_empty() {
            format!("{}{}", self.origin, self.api_base)
        } else {
            format!("{}/{}", self.origin, self.api_base)
        }
    }
}

fn strip_one_slash(value: &str) -> String {
    value.strip_suffix('/').unwrap_or(value).to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = ClientConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.api_base, "/api");
        assert_eq!(config.base_url(), "http://127.0.0.1:8000/api");
    }

    #[test]
    fn override_strips_a_trailing_slash() {
        let config = ClientConfig::from_lookup(lookup_from(&[(API_BASE_VAR, "https://todo.example/api/")]));
        assert_eq!(config.api_base, "https://todo.example/api");
        assert_eq!(config.base_url(), "https://todo.example/api");
    }

    #[test]
    fn relative_override_uses_origin() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (API_BASE_VAR, "/v2/"),
            (API_ORIGIN_VAR, "http://localhost:3000/"),
        ]));
        assert_eq!(config.base_url(), "http://localhost:3000/v2");
    }

    #[test]
    fn empty_override_means_origin_root() {
        let config = ClientConfig::from_lookup(lookup_from(&[(API_BASE_VAR, "/")]));
        assert_eq!(config.api_base, "");
        assert_eq!(config.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::default()
            .with_api_base("api/")
            .with_origin("http://h:1");
        assert_eq!(config.base_url(), "http://h:1/api");
    }
}
