use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::utils::IdStrategy;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Playlist download settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_connect_timeout", with = "duration_serde::duration")]
    pub connect_timeout: Duration,
    /// Maximum idle time between body reads
    #[serde(default = "default_read_timeout", with = "duration_serde::duration")]
    pub read_timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// How parsed channels are presented to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_channel_name")]
    pub default_channel_name: String,
    /// Logo used when a channel has none; `{initials}` is replaced with the
    /// first two characters of the channel name
    #[serde(default = "default_placeholder_logo_template")]
    pub placeholder_logo_template: String,
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

fn parse_default_duration(value: &str) -> Duration {
    humantime::parse_duration(value).unwrap_or(Duration::from_secs(15))
}

fn default_connect_timeout() -> Duration {
    parse_default_duration(DEFAULT_CONNECT_TIMEOUT)
}

fn default_read_timeout() -> Duration {
    parse_default_duration(DEFAULT_READ_TIMEOUT)
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_channel_name() -> String {
    DEFAULT_CHANNEL_NAME.to_string()
}

fn default_placeholder_logo_template() -> String {
    DEFAULT_PLACEHOLDER_LOGO_TEMPLATE.to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            read_timeout: default_read_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_channel_name: default_channel_name(),
            placeholder_logo_template: default_placeholder_logo_template(),
            id_strategy: IdStrategy::default(),
        }
    }
}

impl CatalogConfig {
    /// Placeholder logo URL for a channel without one
    pub fn placeholder_logo(&self, channel_name: &str) -> String {
        let initials: String = channel_name.trim().chars().take(2).collect();
        let encoded: String = url::form_urlencoded::byte_serialize(initials.as_bytes()).collect();
        self.placeholder_logo_template
            .replace(INITIALS_PLACEHOLDER, &encoded)
    }
}

impl Config {
    /// Load configuration: built-in defaults, then the optional TOML file,
    /// then `M3U_CHANNELS_*` environment variables (`__` separates sections).
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(AppError::configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_NESTING_SEPARATOR))
            .extract()
            .map_err(|e| AppError::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document on top of the defaults, without environment overrides.
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(contents))
            .extract()
            .map_err(|e| AppError::configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> AppResult<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::internal(e.to_string()))
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.fetch.connect_timeout.is_zero() {
            return Err(AppError::configuration("fetch.connect_timeout must be greater than zero"));
        }
        if self.fetch.read_timeout.is_zero() {
            return Err(AppError::configuration("fetch.read_timeout must be greater than zero"));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::configuration("fetch.user_agent must not be empty"));
        }
        if !self
            .catalog
            .placeholder_logo_template
            .contains(INITIALS_PLACEHOLDER)
        {
            return Err(AppError::configuration(format!(
                "catalog.placeholder_logo_template must contain {INITIALS_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fetch.connect_timeout, Duration::from_secs(15));
        assert_eq!(config.fetch.read_timeout, Duration::from_secs(15));
        assert!(config.fetch.user_agent.starts_with("m3u-channels/"));
        assert_eq!(config.catalog.default_channel_name, "Unknown Channel");
        assert_eq!(config.catalog.id_strategy, IdStrategy::Md5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [fetch]
            connect_timeout = "5s"

            [catalog]
            id_strategy = "hash"
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.fetch.read_timeout, Duration::from_secs(15));
        assert_eq!(config.catalog.id_strategy, IdStrategy::Hash);
        assert_eq!(config.catalog.default_channel_name, "Unknown Channel");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[fetch]\nread_timeout = \"30s\"\nuser_agent = \"TestAgent/2.0\"\n\n[catalog]\ndefault_channel_name = \"Unnamed\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.fetch.read_timeout, Duration::from_secs(30));
        assert_eq!(config.fetch.user_agent, "TestAgent/2.0");
        assert_eq!(config.catalog.default_channel_name, "Unnamed");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let result = Config::load(Some(missing.as_path()));
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(Config::from_toml_str("[fetch]\nconnect_timeout = \"0s\"").is_err());
        assert!(Config::from_toml_str("[fetch]\nread_timeout = 0").is_err());
        assert!(
            Config::from_toml_str("[catalog]\nplaceholder_logo_template = \"https://logo.example/x.png\"")
                .is_err()
        );
        assert!(Config::from_toml_str("[catalog]\nid_strategy = \"sha1\"").is_err());
    }

    #[test]
    fn test_placeholder_logo() {
        let catalog = CatalogConfig::default();
        assert_eq!(
            catalog.placeholder_logo("News HD"),
            "https://via.placeholder.com/150?text=Ne"
        );
        assert_eq!(
            catalog.placeholder_logo("A B"),
            "https://via.placeholder.com/150?text=A+"
        );
        assert_eq!(catalog.placeholder_logo(""), "https://via.placeholder.com/150?text=");
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config::default();
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("connect_timeout = \"15s\""));
        assert_eq!(Config::from_toml_str(&rendered).unwrap(), config);
    }
}
