//! Shared configuration: built-in defaults, a TOML file, and
//! `INGRESSO_*` environment overrides, merged in that order.
//!
//! The defaults point at a backend on `localhost:5000`, so a bare
//! `ingresso-tui` needs no configuration at all. CLI flag overrides are
//! applied by the binaries on top of what this crate loads.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Environment variable prefix: `INGRESSO_SERVER_URL`, etc.
const ENV_PREFIX: &str = "INGRESSO_";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The figment stack failed to merge or extract.
    #[error("failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),

    /// An endpoint value did not parse as a URL.
    #[error("invalid {field} URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
}

// ── Config ──────────────────────────────────────────────────────────

/// Client configuration.
///
/// Field-for-field serializable so the defaults can seed the figment
/// stack via `Serialized::defaults`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bot backend root, e.g. `http://localhost:5000`.
    pub server_url: String,
    /// Push channel endpoint, e.g. `ws://localhost:5000/status`.
    pub status_url: String,
    /// Attach the live status subscription on startup.
    pub live_updates: bool,
    /// Optional HTTP timeout in whole seconds. Absent means a submission
    /// waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Log file for the TUI (never stdout — that corrupts the terminal).
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".into(),
            status_url: "ws://localhost:5000/status".into(),
            live_updates: true,
            timeout_secs: None,
            log_file: PathBuf::from("/tmp/ingresso-tui.log"),
        }
    }
}

/// Parsed endpoint pair, validated once at startup.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub server: Url,
    pub status: Url,
}

impl Config {
    /// Parse and validate both endpoint URLs.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let server = self
            .server_url
            .parse()
            .map_err(|_| ConfigError::InvalidUrl {
                field: "server",
                value: self.server_url.clone(),
            })?;
        let status = self
            .status_url
            .parse()
            .map_err(|_| ConfigError::InvalidUrl {
                field: "status",
                value: self.status_url.clone(),
            })?;
        Ok(Endpoints { server, status })
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Default config file path: `<project config dir>/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "ingresso")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration, lowest to highest precedence: built-in defaults,
/// TOML file (explicit path or the default location), `INGRESSO_*` env.
pub fn load(file: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    let path = file.map(Path::to_path_buf).or_else(config_path);
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .map_err(|e| ConfigError::Load(Box::new(e)))
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_target_a_local_backend() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://localhost:5000");
        assert_eq!(config.status_url, "ws://localhost:5000/status");
        assert!(config.live_updates);
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn default_endpoints_parse() {
        let endpoints = Config::default().endpoints().expect("defaults are valid");
        assert_eq!(endpoints.server.scheme(), "http");
        assert_eq!(endpoints.status.scheme(), "ws");
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let config = Config {
            server_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            config.endpoints(),
            Err(ConfigError::InvalidUrl { field: "server", .. })
        ));
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "server_url = \"http://10.0.0.2:5000\"\nlive_updates = false\n",
        )
        .expect("config written");

        let config = load(Some(&path)).expect("loads");

        assert_eq!(config.server_url, "http://10.0.0.2:5000");
        assert!(!config.live_updates);
        // Untouched keys keep their defaults.
        assert_eq!(config.status_url, "ws://localhost:5000/status");
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "server_url = \"http://from-file:5000\"\n",
            )?;
            jail.set_env("INGRESSO_SERVER_URL", "http://from-env:5000");
            jail.set_env("INGRESSO_TIMEOUT_SECS", "20");

            let config =
                load(Some(Path::new("config.toml"))).expect("loads with env overrides");

            assert_eq!(config.server_url, "http://from-env:5000");
            assert_eq!(config.timeout_secs, Some(20));
            Ok(())
        });
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load(Some(Path::new("/nonexistent/ingresso.toml"))).expect("loads");
        assert_eq!(config.server_url, "http://localhost:5000");
    }
}
