//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::client::RemoteClient;
use crate::error::{PlannerError, PlannerResult};
use crate::grid::WeekStart;
use crate::storage::FileStorage;
use crate::store::LocalPlanner;

static DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("planner"))
        .unwrap_or_else(|| PathBuf::from("~/.planner"))
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Configuration at ~/.config/planner/config.toml, overridable with
/// `PLANNER_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlannerConfig {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub week_start: WeekStart,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            backend: BackendKind::default(),
            data_dir: default_data_dir(),
            server_url: default_server_url(),
            token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            week_start: WeekStart::default(),
        }
    }
}

impl PlannerConfig {
    pub fn config_path() -> PlannerResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlannerError::Config("Could not determine config directory".into()))?
            .join("planner");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template first
    /// if no config file exists yet.
    pub fn load() -> PlannerResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> PlannerResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("PLANNER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| PlannerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlannerError::Config(e.to_string()))
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn local_planner(&self) -> PlannerResult<LocalPlanner<FileStorage>> {
        let storage = FileStorage::open(self.data_path())?;
        Ok(LocalPlanner::load(storage))
    }

    pub fn remote_client(&self) -> PlannerResult<RemoteClient> {
        RemoteClient::new(&self.server_url, self.token.clone(), self.request_timeout())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> PlannerResult<()> {
        let contents = format!(
            "\
# planner configuration

# Where tasks and notes are kept: \"local\" or \"remote\"
# backend = \"local\"

# Directory for the local backend:
# data_dir = \"{}\"

# Server for the remote backend:
# server_url = \"{}\"
# token = \"...\"
# request_timeout_secs = {}

# First column of the month view: \"sunday\" or \"monday\"
# week_start = \"sunday\"
",
            default_data_dir().display(),
            DEFAULT_SERVER_URL,
            DEFAULT_TIMEOUT_SECS,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlannerError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PlannerError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
