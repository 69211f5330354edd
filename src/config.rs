// Startup configuration.
//
// The CLI takes no arguments; the service address and the connection
// refresh window come from the environment, falling back to the public
// Combat Critters API.

use std::time::Duration;

use reqwest::Url;

use crate::error::{CritterError, Result};

pub const DEFAULT_BASE_URL: &str = "http://api.combatcritters.ca:4000";

/// Pooled connections are replaced after this long so DNS changes are
/// picked up by a long-running shell.
pub const DEFAULT_CONNECTION_LIFETIME: Duration = Duration::from_secs(30 * 60);

pub const BASE_URL_VAR: &str = "CRITTER_API_URL";
pub const LIFETIME_VAR: &str = "CRITTER_CONNECTION_LIFETIME_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: Url,
    pub connection_lifetime: Duration,
}

impl Config {
    /// Build a config from `CRITTER_API_URL` and
    /// `CRITTER_CONNECTION_LIFETIME_SECS`, defaulting whatever is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var(BASE_URL_VAR).ok().as_deref(),
            std::env::var(LIFETIME_VAR).ok().as_deref(),
        )
    }

    fn from_vars(base_url: Option<&str>, lifetime_secs: Option<&str>) -> Result<Self> {
        let base_url = match base_url {
            Some(raw) => parse_base_url(raw)?,
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| CritterError::config(format!("Invalid default url: {e}")))?,
        };

        let connection_lifetime = match lifetime_secs {
            Some(raw) => parse_lifetime(raw)?,
            None => DEFAULT_CONNECTION_LIFETIME,
        };

        Ok(Self {
            base_url,
            connection_lifetime,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| CritterError::config(format!("Invalid {BASE_URL_VAR} '{raw}': {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CritterError::config(format!(
            "Invalid scheme '{}' in {BASE_URL_VAR}. Expected 'http' or 'https'",
            url.scheme()
        )));
    }
    Ok(url)
}

fn parse_lifetime(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(CritterError::config(format!(
            "{LIFETIME_VAR} must be a positive number of seconds, got '{raw}'"
        ))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}

// Tests build configs by overriding fields of the unset-environment one.
#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self::from_vars(None, None).expect("defaults are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_vars(None, None).unwrap();
        assert_eq!(config.base_url.host_str(), Some("api.combatcritters.ca"));
        assert_eq!(config.base_url.port(), Some(4000));
        assert_eq!(config.connection_lifetime, Duration::from_secs(1800));
    }

    #[test]
    fn test_default_matches_unset_environment() {
        assert_eq!(Config::default(), Config::from_vars(None, None).unwrap());
    }

    #[test]
    fn test_overrides_from_vars() {
        let config = Config::from_vars(Some("https://localhost:8443"), Some("60")).unwrap();
        assert_eq!(config.base_url.as_str(), "https://localhost:8443/");
        assert_eq!(config.connection_lifetime, Duration::from_secs(60));
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = Config::from_vars(Some("not a url"), None).unwrap_err();
        assert!(matches!(err, CritterError::Config(_)));

        let err = Config::from_vars(Some("ftp://example.com"), None).unwrap_err();
        assert!(err.to_string().contains("Invalid scheme 'ftp'"));
    }

    #[test]
    fn test_rejects_bad_lifetime() {
        assert!(Config::from_vars(None, Some("0")).is_err());
        assert!(Config::from_vars(None, Some("soon")).is_err());
    }
}
