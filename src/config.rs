//! Client configuration
//!
//! Layered lowest to highest: built-in defaults, the optional config file,
//! `SPOTIFY_CLONE_*` environment variables, then command line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::store::SessionStorage;

const APP_DIR: &str = "spotify-clone-tui";
const DEFAULT_API_URL: &str = "http://localhost:5000/api/";
const ENV_PREFIX: &str = "SPOTIFY_CLONE";

/// Terminal client for the music streaming backend
#[derive(Debug, Parser)]
#[command(name = "spotify-clone-tui", version, about)]
pub struct Cli {
    /// Base url of the backend API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Config file (toml or json)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid api url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub log_dir: PathBuf,
    /// Where session-scoped store snapshots live
    pub session_dir: PathBuf,
    /// Persisted bearer token
    pub token_file: PathBuf,
    pub toast_seconds: u64,
}

impl AppConfig {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join(APP_DIR);

        let mut builder = config::Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("request_timeout_secs", 15_i64)?
            .set_default("log_dir", path_str(&cache_dir.join("logs")))?
            .set_default("session_dir", path_str(&SessionStorage::default_dir()))?
            .set_default("token_file", path_str(&cache_dir.join("token")))?
            .set_default("toast_seconds", 5_i64)?;

        builder = match &cli.config {
            Some(path) => builder.add_source(config::File::from(path.as_path()).required(true)),
            None => match default_config_file() {
                Some(path) => builder.add_source(config::File::from(path).required(false)),
                None => builder,
            },
        };

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));

        if let Some(url) = &cli.api_url {
            builder = builder.set_override("api_url", url.as_str())?;
        }
        if let Some(dir) = &cli.log_dir {
            builder = builder.set_override("log_dir", path_str(dir))?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        // Fail early on a malformed url rather than on the first request.
        config.api_base_url()?;
        Ok(config)
    }

    /// Base url with a trailing slash so relative endpoint paths join under it
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        normalize_api_url(&self.api_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn toast_lifetime(&self) -> Duration {
        Duration::from_secs(self.toast_seconds.max(1))
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub fn normalize_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url = Url::parse(&with_slash).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_api_url_gets_trailing_slash() {
        let url = normalize_api_url("https://music.example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://music.example.com/api/");
        assert_eq!(url.join("stats/general").unwrap().path(), "/api/stats/general");
    }

    #[test]
    fn test_api_url_rejects_garbage() {
        assert!(normalize_api_url("not a url").is_err());
        assert!(matches!(
            normalize_api_url("ftp://example.com"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_file_and_cli_layers() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_url = \"http://file.example/api\"\ntoast_seconds = 9").unwrap();

        let cli = Cli {
            api_url: None,
            config: Some(file.path().to_path_buf()),
            log_dir: Some(PathBuf::from("/tmp/sc-logs")),
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.api_url, "http://file.example/api");
        assert_eq!(config.toast_seconds, 9);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/sc-logs"));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));

        let cli = Cli {
            api_url: Some("http://flag.example".into()),
            config: Some(file.path().to_path_buf()),
            log_dir: None,
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.api_base_url().unwrap().as_str(), "http://flag.example/");
    }
}
