// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{Result, WaznError};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ANALYZE_PATH: &str = "/api/analyze";

/// Where and how to reach the analysis service.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub analyze_path: String,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

/// Shape of `config.toml`. Every key is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub api_base: Option<String>,

    #[serde(default)]
    pub analyze_path: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            analyze_path: DEFAULT_ANALYZE_PATH.to_string(),
            timeout: None,
        }
    }
}

impl FileConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

impl AppConfig {
    /// Load configuration from the config file (if any) and then the
    /// environment. An explicitly given path must exist.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = config_file_path(explicit_path) {
            log::debug!("Reading config file {}", path.display());
            config = config.merge_file(FileConfig::from_path(&path)?);
        }

        config.with_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self> {
        Self::default().with_lookup(|key| std::env::var(key).ok())
    }

    pub fn merge_file(mut self, file: FileConfig) -> Self {
        if let Some(api_base) = file.api_base {
            self.api_base = api_base;
        }
        if let Some(path) = file.analyze_path {
            self.analyze_path = path;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    /// Apply `WAZN_*` variables resolved through `lookup`, then validate.
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup("WAZN_API_BASE") {
            self.api_base = api_base.trim().to_string();
        }
        if let Some(path) = lookup("WAZN_ANALYZE_PATH") {
            self.analyze_path = path.trim().to_string();
        }
        if let Some(raw) = lookup("WAZN_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                WaznError::Config(format!("WAZN_TIMEOUT_SECS must be a whole number, got '{}'", raw))
            })?;
            self.timeout = Some(Duration::from_secs(secs));
        }
        self.validate()?;
        Ok(self)
    }

    /// Command-line flags win over everything else.
    pub fn with_overrides(mut self, api_base: Option<String>, timeout_secs: Option<u64>) -> Result<Self> {
        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(WaznError::Config(format!(
                "api_base must start with http:// or https://, got '{}'",
                self.api_base
            )));
        }
        if !self.analyze_path.starts_with('/') {
            return Err(WaznError::Config(format!(
                "analyze_path must start with '/', got '{}'",
                self.analyze_path
            )));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(WaznError::Config("timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Full URL of the analyze endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), self.analyze_path)
    }
}

fn config_file_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("WAZN_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("wazn").join("config.toml"))
        .filter(|path| path.exists())
}
