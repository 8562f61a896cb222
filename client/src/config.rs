//! Configuration management for the Choplan registration client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides such as `CHOPLAN_API__AUTH_BASE_URL`

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{Language, Redirect};

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Account service endpoints
    pub api: ApiConfig,

    /// Session persistence
    pub session: SessionConfig,

    /// Presentation settings
    pub ui: UiConfig,

    /// Frontend routes used after signup or login
    pub routes: RoutesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the auth endpoints (`/auth/...`)
    pub auth_base_url: String,

    /// Base URL of the restaurant endpoints, including `/restaurants`
    pub restaurants_base_url: String,

    /// Per-request timeout; no timeout when unset
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// File holding the signed-in session
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// Language of notices and error messages
    pub language: Language,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    pub owner_dashboard: String,
    pub home: String,
}

impl RoutesConfig {
    pub fn path_for(&self, redirect: Redirect) -> &str {
        match redirect {
            Redirect::OwnerDashboard => &self.owner_dashboard,
            Redirect::Home => &self.home,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CHOPLAN_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.auth_base_url", "http://localhost:8080/api/demo")?
            .set_default("api.restaurants_base_url", "http://localhost:8080/api/restaurants")?
            .set_default("session.path", ".choplan/session.json")?
            .set_default("ui.language", "korean")?
            .set_default("routes.owner_dashboard", "/owner-dashboard")?
            .set_default("routes.home", "/")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CHOPLAN_ prefix)
            .add_source(
                Environment::with_prefix("CHOPLAN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            owner_dashboard: "/owner-dashboard".to_string(),
            home: "/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_for_redirect() {
        let routes = RoutesConfig::default();
        assert_eq!(routes.path_for(Redirect::OwnerDashboard), "/owner-dashboard");
        assert_eq!(routes.path_for(Redirect::Home), "/");
    }

    #[test]
    fn test_env_overrides_nested_key() {
        std::env::set_var("CHOPLAN_API__AUTH_BASE_URL", "https://auth.choplan.kr/api");
        let loaded = Config::load();
        std::env::remove_var("CHOPLAN_API__AUTH_BASE_URL");

        let config = loaded.unwrap();
        assert_eq!(config.api.auth_base_url, "https://auth.choplan.kr/api");
        assert_eq!(config.routes.home, "/");
    }
}
