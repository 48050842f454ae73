use std::collections::HashMap;

use bytes::Bytes;
use hyper::http;
use tokio::io::AsyncReadExt;

use super::conditional::{Freshness, finish};
use super::r#static::StaticHandler;
use super::{Response, ServeError};
use crate::cache::HashCache;
use crate::loader::File;
use crate::util::hash::{hash_reader, parse_hashed_filepath};
use crate::util::path::{basename, clean_path};

/// Per-request handler for a mount with content-hashed URLs.
///
/// With hashing on, a request must name `<stem>.<hash><ext>` where `<hash>`
/// matches the file's current content hash; anything else is a 404.
/// Stylesheets are served with their internal references rewritten.
#[derive(Debug, Clone, Copy)]
pub struct CacheBustingHandler<'a> {
    base: StaticHandler<'a>,
    cache: &'a HashCache,
}

impl<'a> CacheBustingHandler<'a> {
    pub fn new(base: StaticHandler<'a>, cache: &'a HashCache) -> Self {
        CacheBustingHandler { base, cache }
    }

    pub async fn get(&self, filepath: &str, headers: &http::HeaderMap) -> Result<Response, ServeError> {
        if !self.base.mount().hash_paths {
            return self.base.get(filepath, headers).await;
        }

        let logical = clean_path(filepath);
        let Some((unhashed, claimed)) = parse_hashed_filepath(&logical) else {
            log::debug!("[smart-static] `{logical}` carries no hash");
            return Err(ServeError::NotFound);
        };

        let computed = self.path_hash(&unhashed).await?.ok_or(ServeError::NotFound)?;
        if claimed != computed {
            log::debug!("[smart-static] stale hash for `{unhashed}`: {claimed} != {computed}");
            return Err(ServeError::NotFound);
        }

        if self.base.mimetype(basename(&unhashed)) == "text/css" {
            return self.make_css_response(&unhashed, headers).await;
        }
        self.base.get(&unhashed, headers).await
    }

    /// Content hash of a logical path, computed on first use.
    pub async fn path_hash(&self, logical: &str) -> Result<Option<String>, ServeError> {
        let base = self.base;
        self.cache
            .get_or_compute_hash(logical, || hash_file(base, logical))
            .await
    }

    async fn make_css_response(&self, unhashed: &str, headers: &http::HeaderMap) -> Result<Response, ServeError> {
        let file = self.base.get_file(unhashed).await?.ok_or(ServeError::NotFound)?;
        let builder = match self.base.mount().responder.evaluate(headers, &file)? {
            Freshness::NotModified(resp) => return Ok(resp),
            Freshness::Modified(builder) => builder,
        };
        let mtime = file.mtime;
        let mimetype = file.mimetype.clone();

        let contents = self
            .cache
            .get_or_compute_contents(unhashed, || self.rewrite_stylesheet(unhashed, file))
            .await?;
        finish(builder, &mimetype, mtime, Bytes::from(contents))
    }

    async fn rewrite_stylesheet(&self, unhashed: &str, mut file: File) -> Result<String, ServeError> {
        let mut raw = Vec::with_capacity(usize::try_from(file.size).unwrap_or(0));
        file.handle.read_to_end(&mut raw).await?;
        drop(file);
        let mut css = String::from_utf8(raw).map_err(|_| ServeError::InvalidUtf8(unhashed.to_string()))?;

        let mount = self.base.mount();
        let stylesheet_url = mount.site_url(unhashed);
        for pass in mount.rewriter.passes() {
            let mut hashes = HashMap::new();
            for target in mount.rewriter.targets(pass, &css, &stylesheet_url) {
                if let Some(hash) = self.path_hash(&target).await? {
                    hashes.insert(target, hash);
                }
            }
            css = mount.rewriter.apply(pass, &css, &stylesheet_url, &hashes);
        }
        log::debug!("[smart-static] rewrote `{unhashed}` ({} bytes)", css.len());
        Ok(css)
    }
}

async fn hash_file(base: StaticHandler<'_>, logical: &str) -> Result<Option<String>, ServeError> {
    let Some(mut file) = base.get_file(logical).await? else {
        return Ok(None);
    };
    let hash = hash_reader(&mut file.handle).await?;
    log::debug!("[smart-static] hashed `{logical}` -> {hash}");
    Ok(Some(hash))
}
