use bytes::Bytes;
use hyper::http;
use tokio::io::AsyncReadExt;

use super::conditional::{Freshness, finish};
use super::{Response, ServeError};
use crate::build::mount::LoadedMount;
use crate::loader::File;
use crate::util::hash::split_ext;
use crate::util::path::clean_path;

/// Serves single files out of a mount, honoring conditional requests.
#[derive(Debug, Clone, Copy)]
pub struct StaticHandler<'a> {
    mount: &'a LoadedMount,
}

impl<'a> StaticHandler<'a> {
    pub fn new(mount: &'a LoadedMount) -> Self {
        StaticHandler { mount }
    }

    pub fn mount(&self) -> &'a LoadedMount {
        self.mount
    }

    pub async fn get(&self, filepath: &str, headers: &http::HeaderMap) -> Result<Response, ServeError> {
        let file = self.get_file(filepath).await?.ok_or(ServeError::NotFound)?;
        self.make_response(file, headers).await
    }

    /// Sanitize, resolve and open. `Ok(None)` covers both a missing file and
    /// one hidden by the disallow pattern.
    pub async fn get_file(&self, filepath: &str) -> Result<Option<File>, ServeError> {
        let logical = clean_path(filepath);
        let Some(source) = self.mount.loader.resolve(&logical).await else {
            return Ok(None);
        };
        if !self.is_allowed(&source.name) {
            log::debug!("[smart-static] `{logical}` matches the disallow pattern");
            return Ok(None);
        }
        let mimetype = self.mimetype(&source.name);
        Ok(Some(source.open(mimetype).await?))
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        self.mount
            .disallow
            .as_ref()
            .is_none_or(|pattern| !pattern.matches(name))
    }

    pub fn mimetype(&self, name: &str) -> String {
        let ext = split_ext(name).1.trim_start_matches('.').to_ascii_lowercase();
        if let Some(mimetype) = self.mount.mimetypes.get(&ext) {
            return mimetype.clone();
        }
        mime_guess::from_path(name)
            .first_raw()
            .map_or_else(|| self.mount.fallback_mimetype.clone(), str::to_string)
    }

    async fn make_response(&self, mut file: File, headers: &http::HeaderMap) -> Result<Response, ServeError> {
        let builder = match self.mount.responder.evaluate(headers, &file)? {
            Freshness::NotModified(resp) => return Ok(resp),
            Freshness::Modified(builder) => builder,
        };
        let mut body = Vec::with_capacity(usize::try_from(file.size).unwrap_or(0));
        file.handle.read_to_end(&mut body).await?;
        finish(builder, &file.mimetype, file.mtime, Bytes::from(body))
    }
}
