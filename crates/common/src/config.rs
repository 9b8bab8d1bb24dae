//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Page fetching configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Preview cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Bitchute enrichment configuration.
    #[serde(default)]
    pub bitchute: BitchuteConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Page fetching configuration.
///
/// These are the fallbacks for the per-request `userAgent` and
/// `timeoutInMilliseconds` query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// `User-Agent` header value sent when a request does not supply one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Whole-request timeout in milliseconds when a request does not supply one.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Preview cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Sliding expiration window in seconds. Every read resets the countdown.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

/// Bitchute enrichment configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BitchuteConfig {
    /// Video metadata API endpoint queried when a page exposes neither a
    /// magnet link nor an inline video source.
    #[serde(default = "default_media_api_url")]
    pub media_api_url: String,
    /// Timeout in milliseconds for the media API request.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_user_agent() -> String {
    "bastyon".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_cache_ttl_secs() -> u64 {
    60 * 60
}

fn default_media_api_url() -> String {
    "https://api.bitchute.com/api/beta/video/media".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for BitchuteConfig {
    fn default() -> Self {
        Self {
            media_api_url: default_media_api_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `OPENGRAPH_ENV`)
    /// 3. Environment variables with `OPENGRAPH_` prefix
    ///
    /// Every setting has a default, so all three sources are optional.
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("OPENGRAPH_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("OPENGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("OPENGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_setting() {
        let config: Config = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.fetch.user_agent, "bastyon");
        assert_eq!(config.fetch.timeout_ms, 10_000);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(
            config.bitchute.media_api_url,
            "https://api.bitchute.com/api/beta/video/media"
        );
    }

    #[test]
    fn test_file_values_override_defaults() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nport = 8080\n\n[cache]\nttl_secs = 60\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl_secs, 60);
        // Untouched sections keep their defaults.
        assert_eq!(config.fetch.timeout_ms, 10_000);
    }
}
