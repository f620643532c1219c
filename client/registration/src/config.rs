//! Application configuration loaded from environment variables.

use std::time::Duration;

use crate::catalog::DEFAULT_COMMUNITY_LINK;
use crate::errors::{RegistrationError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the registration backend (e.g. https://api.hackforge.example)
    pub backend_url: String,
    /// Invite link shown once a team has registered
    pub community_link: String,
    /// Upper bound for a single submission request, in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` is the
    /// process-environment flavour of this.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                RegistrationError::Config(
                    "BACKEND_URL environment variable is required".to_string(),
                )
            })?;

        Ok(Config {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            community_link: lookup("COMMUNITY_INVITE_LINK")
                .unwrap_or_else(|| DEFAULT_COMMUNITY_LINK.to_string()),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| {
                    RegistrationError::Config("Invalid REQUEST_TIMEOUT_SECS".to_string())
                })?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `POST` target for new registrations.
    pub fn registrations_endpoint(&self) -> String {
        format!("{}/api/registrations", self.backend_url)
    }
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_backend_is_set() {
        let config = Config::from_lookup(lookup_from(&[("BACKEND_URL", "http://localhost:5000/")]))
            .unwrap();
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert_eq!(config.community_link, DEFAULT_COMMUNITY_LINK);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(
            config.registrations_endpoint(),
            "http://localhost:5000/api/registrations"
        );
    }

    #[test]
    fn missing_backend_is_a_config_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, RegistrationError::Config(_)));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("BACKEND_URL", "http://localhost:5000"),
            ("REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn community_link_can_be_overridden() {
        let config = Config::from_lookup(lookup_from(&[
            ("BACKEND_URL", "http://localhost:5000"),
            ("COMMUNITY_INVITE_LINK", "https://chat.example/abc"),
        ]))
        .unwrap();
        assert_eq!(config.community_link, "https://chat.example/abc");
    }
}
