// Configuration loading and path resolution.
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{BoardError, Result};
use crate::store::DEFAULT_SLOT;

/// Overrides both the data and config directory when set.
pub const HOME_ENV: &str = "TASKBOARD_HOME";

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub store_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            log_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        toml::from_str(&content).map_err(|source| BoardError::Config {
            path: path.display().to_string(),
            source,
        })
    }

    /// `--store` beats `store_path`, which beats the data directory default.
    pub fn resolve_store_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        Ok(Paths::data_dir()?.join(format!("{DEFAULT_SLOT}.json")))
    }

    pub fn resolve_log_file(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Paths::data_dir()?.join("taskboard.log")),
        }
    }
}

pub struct Paths;

impl Paths {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "taskboard", "taskboard")
    }

    pub fn data_dir() -> Result<PathBuf> {
        if let Ok(home) = env::var(HOME_ENV) {
            return Ok(PathBuf::from(home));
        }
        Self::project_dirs()
            .map(|p| p.data_dir().to_path_buf())
            .ok_or(BoardError::NoDataDir("data"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(home) = env::var(HOME_ENV) {
            return Ok(PathBuf::from(home));
        }
        Self::project_dirs()
            .map(|p| p.config_dir().to_path_buf())
            .ok_or(BoardError::NoDataDir("config"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
