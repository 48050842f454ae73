use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::cache::HashCache;
use crate::config::error::ConfigError;
use crate::config::mount::{MountConfig, validate_mount};
use crate::css::CssRewriter;
use crate::handler::{CacheBustingHandler, CachePolicy, ConditionalResponder, ServeError, StaticHandler};
use crate::loader::Loader;
use crate::util::hash::add_hash_to_filepath;
use crate::util::path::clean_path;

/// Runtime form of a mount, shared read-only by every request.
#[derive(Debug)]
pub struct LoadedMount {
    /// Leading and trailing `/`.
    pub prefix: String,
    pub loader: Loader,
    pub hash_paths: bool,
    pub disallow: Option<glob::Pattern>,
    pub responder: ConditionalResponder,
    pub fallback_mimetype: String,
    /// Lowercase extension without the dot -> MIME type.
    pub mimetypes: HashMap<String, String>,
    pub rewriter: CssRewriter,
}

impl LoadedMount {
    /// Public URL of a logical path in this mount.
    pub fn site_url(&self, logical: &str) -> String {
        format!("{}{}", self.prefix, logical.trim_start_matches('/'))
    }
}

/// Factory for per-request handlers. Clones share one [`HashCache`], so
/// every request under a mount sees the same hashes and rewritten sheets.
#[derive(Debug, Clone)]
pub struct SmartStatic {
    mount: Arc<LoadedMount>,
    cache: Arc<HashCache>,
}

impl SmartStatic {
    pub fn new(mount: LoadedMount) -> Self {
        SmartStatic {
            mount: Arc::new(mount),
            cache: Arc::new(HashCache::new()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.mount.prefix
    }

    pub fn mount(&self) -> &LoadedMount {
        &self.mount
    }

    pub fn cache(&self) -> &HashCache {
        &self.cache
    }

    pub fn handler(&self) -> CacheBustingHandler<'_> {
        CacheBustingHandler::new(StaticHandler::new(&self.mount), &self.cache)
    }

    /// The URL a page should link to for `filepath`, hash included when the
    /// mount enforces hashes.
    pub async fn build_url(&self, filepath: &str) -> Result<String, ServeError> {
        let logical = clean_path(filepath);
        if !self.mount.hash_paths {
            return Ok(self.mount.site_url(&logical));
        }
        let hash = self
            .handler()
            .path_hash(&logical)
            .await?
            .ok_or(ServeError::NotFound)?;
        Ok(self.mount.site_url(&add_hash_to_filepath(&logical, &hash)))
    }
}

pub fn build_mount(cfg: &MountConfig) -> Result<SmartStatic, ConfigError> {
    validate_mount(cfg)?;
    let prefix = cfg.normalized_prefix();
    let loader = Loader::for_root(Path::new(&cfg.root))
        .map_err(|e| ConfigError::Invalid(format!("mount root `{}`: {e}", cfg.root)))?;
    let disallow = cfg
        .disallow
        .as_deref()
        .map(glob::Pattern::new)
        .transpose()
        .map_err(|e| ConfigError::Invalid(format!("disallow pattern: {e}")))?;
    let rewriter = CssRewriter::new(&prefix)
        .map_err(|e| ConfigError::Invalid(format!("stylesheet patterns: {e}")))?;
    let mimetypes = cfg
        .mimetypes
        .iter()
        .map(|(ext, ty)| (ext.trim_start_matches('.').to_ascii_lowercase(), ty.clone()))
        .collect();

    log::info!(
        "[smart-static] mounted {} at {prefix} (hash_paths: {})",
        loader.root().display(),
        cfg.hash_paths
    );

    Ok(SmartStatic::new(LoadedMount {
        prefix,
        loader,
        hash_paths: cfg.hash_paths,
        disallow,
        responder: ConditionalResponder::new(CachePolicy {
            enabled: cfg.cache,
            timeout: cfg.cache_timeout,
        }),
        fallback_mimetype: cfg.fallback_mimetype.clone(),
        mimetypes,
        rewriter,
    }))
}
