use std::env;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default port for the HTTP API, matching the original deployment.
const DEFAULT_PORT: u16 = 4000;

/// Centralized configuration for the blogctl ecosystem.
///
/// Resolution order (later wins):
/// 1. `~/.blogctl/config.toml` if present
/// 2. environment (`DATABASE_URL`, `BLOGCTL_HOST`, `BLOGCTL_PORT`)
/// 3. CLI flags (applied by the caller)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    pub database_url: Option<String>,

    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            server: ServerSection::default(),
        }
    }
}

impl BlogConfig {
    /// Load config from ~/.blogctl/config.toml, then apply environment
    /// overrides. A missing file is fine; a malformed file is not.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load config from an explicit path (no env overrides).
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).context("Failed to parse config file (invalid TOML)")
    }

    /// The database URL, or an actionable error when unset.
    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "No database URL configured.\n\n\
                 Set DATABASE_URL, pass --database-url, or add `database_url` to {:?}",
                Self::config_path().unwrap_or_else(|| PathBuf::from("~/.blogctl/config.toml"))
            )
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".blogctl").join("config.toml"))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.is_empty() {
                self.database_url = Some(url);
            }
        }
        if let Ok(host) = env::var("BLOGCTL_HOST") {
            self.server.host = host
                .parse()
                .with_context(|| format!("Invalid BLOGCTL_HOST: {:?}", host))?;
        }
        if let Ok(port) = env::var("BLOGCTL_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid BLOGCTL_PORT: {:?}", port))?;
        }
        Ok(())
    }
}
