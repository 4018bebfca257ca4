//! Server configuration.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! YAML file, the `PORT` / `LOG_LEVEL` environment variables and finally
//! command line flags (applied by the binary).

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub log_level: String,
    pub handlers: HandlersConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

/// Settings for the demo routes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HandlersConfig {
    /// Base URL `/httpbin/...` requests are forwarded to
    pub upstream_url: String,
    /// File streamed by `/video`
    pub video_path: PathBuf,
    /// Read size for streamed bodies; also the largest chunk written
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_level: "info".to_string(),
            handlers: HandlersConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 42069 }
    }
}

impl Default for HandlersConfig {
    fn default() -> Self {
        Self {
            upstream_url: "https://httpbin.org".to_string(),
            video_path: PathBuf::from("assets/vim.mp4"),
            chunk_size: 1024,
        }
    }
}

impl Config {
    /// Loads defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Self::from_yaml(&raw)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };

        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Applies `PORT` and `LOG_LEVEL` as returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port:?}"))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.handlers.chunk_size == 0 {
            bail!("handlers.chunk_size must be greater than zero");
        }
        url::Url::parse(&self.handlers.upstream_url)
            .with_context(|| format!("invalid handlers.upstream_url {:?}", self.handlers.upstream_url))?;
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> anyhow::Result<tracing::Level> {
        self.log_level
            .parse()
            .with_context(|| format!("invalid log_level {:?}", self.log_level))
    }
}
