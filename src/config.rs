//! Runtime configuration from flags and environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::geocode::DEFAULT_GEOCODER_URL;
use crate::storage::LocationCache;

#[derive(Debug, Clone, Parser)]
#[command(name = "kundli-engine", version, about = "Kundli API server")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// OpenCage API key used for city lookups
    #[arg(long, env = "OPENCAGE_API_KEY", hide_env_values = true)]
    pub opencage_api_key: Option<String>,

    #[arg(long, env = "GEOCODER_URL", default_value = DEFAULT_GEOCODER_URL)]
    pub geocoder_url: String,

    /// Geocoder request timeout in seconds
    #[arg(long, env = "GEOCODE_TIMEOUT_SECS", default_value_t = 10)]
    pub geocode_timeout_secs: u64,

    /// SQLite file for cached city lookups
    #[arg(long, env = "KUNDLI_CACHE_PATH")]
    pub cache_path: Option<PathBuf>,

    /// Disable the geocode cache
    #[arg(long, env = "KUNDLI_NO_CACHE")]
    pub no_cache: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            opencage_api_key: None,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocode_timeout_secs: 10,
            cache_path: None,
            no_cache: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_secs(self.geocode_timeout_secs)
    }

    /// Cache file to open, or `None` when caching is off
    pub fn resolved_cache_path(&self) -> Option<PathBuf> {
        if self.no_cache {
            return None;
        }
        Some(
            self.cache_path
                .clone()
                .unwrap_or_else(LocationCache::default_path),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(
            config.socket_addr().unwrap(),
            "0.0.0.0:8000".parse::<SocketAddr>().unwrap()
        );
        assert!(config.resolved_cache_path().is_some());
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "kundli-engine",
            "--port",
            "9191",
            "--host",
            "127.0.0.1",
            "--geocoder-url",
            "http://localhost:1234",
            "--no-cache",
        ])
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9191");
        assert_eq!(config.geocoder_url, "http://localhost:1234");
        assert!(config.resolved_cache_path().is_none());
    }

    #[test]
    fn explicit_cache_path() {
        let config = ServerConfig {
            cache_path: Some(PathBuf::from("/tmp/k.sqlite3")),
            ..Default::default()
        };
        assert_eq!(config.resolved_cache_path(), Some(PathBuf::from("/tmp/k.sqlite3")));
    }

    #[test]
    fn invalid_host_is_rejected() {
        let config = ServerConfig {
            host: "not an ip".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(ServerConfig::try_parse_from(["kundli-engine", "--port", "70000"]).is_err());
    }
}
