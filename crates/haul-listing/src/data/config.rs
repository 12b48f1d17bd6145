use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;

use crate::core::BackoffPolicy;
use crate::error::ConfigError;

/// Listing settings as read from a TOML file and the environment.
///
/// ```toml
/// repository_url = "https://repo.example/releases"
/// initial_backoff_secs = 5
/// max_backoff_secs = 180
/// timeout_secs = 30
/// user_agent = "haul/0.1"
/// ```
///
/// Every key can be overridden with a `HAUL_`-prefixed environment variable,
/// e.g. `HAUL_MAX_BACKOFF_SECS=60`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingConfig {
    pub repository_url: String,

    #[serde(default = "default_initial_backoff_secs")]
    pub initial_backoff_secs: u64,

    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_initial_backoff_secs() -> u64 {
    BackoffPolicy::DEFAULT_INITIAL.as_secs()
}

fn default_max_backoff_secs() -> u64 {
    BackoffPolicy::DEFAULT_MAX_WAIT.as_secs()
}

impl ListingConfig {
    pub const ENV_PREFIX: &'static str = "HAUL_";

    /// Load from `path`, then apply `HAUL_*` environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::figment(path).extract().map_err(ConfigError::from)
    }

    /// The provider stack used by [`load`](Self::load), for callers that
    /// want to merge further sources.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    /// Validated backoff policy.
    pub fn backoff(&self) -> Result<BackoffPolicy, ConfigError> {
        BackoffPolicy::from_secs(self.initial_backoff_secs, self.max_backoff_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_with_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "haul.toml",
                r#"repository_url = "https://repo.example/releases""#,
            )?;

            let config = ListingConfig::load("haul.toml").unwrap();
            assert_eq!(config.repository_url, "https://repo.example/releases");
            assert_eq!(config.initial_backoff_secs, 5);
            assert_eq!(config.max_backoff_secs, 180);
            assert_eq!(config.timeout(), None);
            assert_eq!(config.backoff().unwrap(), BackoffPolicy::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "haul.toml",
                r#"
                repository_url = "https://repo.example/releases"
                max_backoff_secs = 300
                timeout_secs = 30
                "#,
            )?;
            jail.set_env("HAUL_MAX_BACKOFF_SECS", "60");
            jail.set_env("HAUL_USER_AGENT", "haul-test");

            let config = ListingConfig::load("haul.toml").unwrap();
            assert_eq!(config.max_backoff_secs, 60);
            assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
            assert_eq!(config.user_agent.as_deref(), Some("haul-test"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_repository_url_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("haul.toml", "initial_backoff_secs = 2")?;

            let err = ListingConfig::load("haul.toml").unwrap_err();
            assert!(matches!(err, ConfigError::Load(_)));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_backoff_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "haul.toml",
                r#"
                repository_url = "https://repo.example/releases"
                initial_backoff_secs = 0
                "#,
            )?;

            let config = ListingConfig::load("haul.toml").unwrap();
            assert!(matches!(config.backoff(), Err(ConfigError::InitialBackoffTooShort)));
            Ok(())
        });
    }
}
