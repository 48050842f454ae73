use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use super::error::ConfigError;
use super::mount::{MountConfig, validate_mount};

#[derive(Debug, Deserialize, Clone)]
pub struct HttpServer {
    pub bind: String,
    pub mounts: Vec<MountConfig>,
}

impl HttpServer {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: HttpServer = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.trim().is_empty() {
            return Err(ConfigError::Invalid("`bind` cannot be empty".into()));
        }
        if self.mounts.is_empty() {
            return Err(ConfigError::Invalid("`mounts` cannot be empty".into()));
        }
        let mut seen = HashSet::new();
        for mount in &self.mounts {
            validate_mount(mount)?;
            if !seen.insert(mount.normalized_prefix()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate mount prefix `{}`",
                    mount.prefix
                )));
            }
        }
        Ok(())
    }
}
