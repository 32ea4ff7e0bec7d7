//! Server configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("planner-server"))
        .unwrap_or_else(|| PathBuf::from("planner-data"))
}

/// Read from ~/.config/planner/server.toml and `PLANNER_SERVER_*`
/// variables. `PORT` takes precedence for the listen port.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Accepted session tokens. Empty disables authentication.
    #[serde(default)]
    pub auth_tokens: Vec<String>,
}

impl ServerConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("planner");

        Ok(config_dir.join("server.toml"))
    }

    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;

        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("Invalid PORT '{}'", port))?;
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("PLANNER_SERVER")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("auth_tokens"),
            )
            .build()
            .context("Failed to load server config")?
            .try_deserialize()
            .context("Invalid server config")?;

        Ok(config)
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid host '{}'", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn auth_enabled(&self) -> bool {
        self.auth_tokens.iter().any(|t| !t.is_empty())
    }
}
