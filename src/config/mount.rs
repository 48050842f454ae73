use std::collections::HashMap;

use serde::Deserialize;

use super::error::ConfigError;

const DEFAULT_CACHE_TIMEOUT: u64 = 60 * 60 * 12;
/// One year; longer `max-age` values are not useful to caches.
pub const MAX_CACHE_TIMEOUT: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Deserialize, Clone)]
pub struct MountConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    pub root: String,
    #[serde(default = "default_true")]
    pub hash_paths: bool,
    #[serde(default)]
    pub disallow: Option<String>,
    #[serde(default = "default_true")]
    pub cache: bool,
    #[serde(default = "default_cache_timeout")]
    pub cache_timeout: u64,
    #[serde(default = "default_fallback_mimetype")]
    pub fallback_mimetype: String,
    /// Extension overrides, e.g. `.jsx: text/jsx`.
    #[serde(default)]
    pub mimetypes: HashMap<String, String>,
}

impl MountConfig {
    pub fn new(prefix: &str, root: &str) -> Self {
        MountConfig {
            prefix: prefix.to_string(),
            root: root.to_string(),
            hash_paths: true,
            disallow: None,
            cache: true,
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
            fallback_mimetype: default_fallback_mimetype(),
            mimetypes: HashMap::new(),
        }
    }

    /// The prefix with a trailing `/`, as request paths are matched against it.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.prefix.trim_end_matches('/');
        format!("{trimmed}/")
    }
}

pub fn validate_mount(mount: &MountConfig) -> Result<(), ConfigError> {
    if mount.root.trim().is_empty() {
        return Err(ConfigError::Invalid("`mounts.root` cannot be empty".into()));
    }
    if !mount.prefix.starts_with('/') {
        return Err(ConfigError::Invalid(format!(
            "mount prefix `{}` must start with '/'",
            mount.prefix
        )));
    }
    if mount.cache_timeout > MAX_CACHE_TIMEOUT {
        return Err(ConfigError::Invalid(format!(
            "`mounts.cache_timeout` must be at most {MAX_CACHE_TIMEOUT} seconds, got {}",
            mount.cache_timeout
        )));
    }
    if mount.fallback_mimetype.trim().is_empty() {
        return Err(ConfigError::Invalid("`mounts.fallback_mimetype` cannot be empty".into()));
    }
    Ok(())
}

fn default_prefix() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cache_timeout() -> u64 {
    DEFAULT_CACHE_TIMEOUT
}

fn default_fallback_mimetype() -> String {
    "text/plain".to_string()
}
