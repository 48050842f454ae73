//! Freshness handling shared by plain files and rewritten stylesheets.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, http};

use super::{Response, ServeError};
use crate::loader::File;
use crate::util::http::http_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub enabled: bool,
    /// `max-age` in seconds.
    pub timeout: u64,
}

pub enum Freshness {
    /// The client copy is current. Drop the file and send this.
    NotModified(Response),
    /// Headers so far; the caller adds the body via [`finish`].
    Modified(http::response::Builder),
}

#[derive(Debug, Clone, Copy)]
pub struct ConditionalResponder {
    policy: CachePolicy,
}

impl ConditionalResponder {
    pub fn new(policy: CachePolicy) -> Self {
        ConditionalResponder { policy }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn evaluate(
        &self,
        req_headers: &http::HeaderMap,
        file: &File,
    ) -> Result<Freshness, ServeError> {
        let now = SystemTime::now();
        let builder = http::Response::builder().header(header::DATE, http_date(now));

        if !self.policy.enabled {
            return Ok(Freshness::Modified(builder.header(header::CACHE_CONTROL, "public")));
        }

        let etag = generate_etag(file.mtime, file.size, &file.name);
        let builder = builder
            .header(header::ETAG, format!("\"{etag}\""))
            .header(
                header::CACHE_CONTROL,
                format!("max-age={}, public", self.policy.timeout),
            );

        if !is_resource_modified(req_headers, &etag, file.mtime) {
            let resp = builder
                .status(http::StatusCode::NOT_MODIFIED)
                .body(Full::default())?;
            return Ok(Freshness::NotModified(resp));
        }

        let expires = now
            .checked_add(Duration::from_secs(self.policy.timeout))
            .unwrap_or(now);
        Ok(Freshness::Modified(builder.header(header::EXPIRES, http_date(expires))))
    }
}

/// Complete a 200 response started by [`ConditionalResponder::evaluate`].
pub fn finish(
    builder: http::response::Builder,
    content_type: &str,
    last_modified: SystemTime,
    body: Bytes,
) -> Result<Response, ServeError> {
    Ok(builder
        .status(http::StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, body.len().to_string())
        .header(header::LAST_MODIFIED, http_date(last_modified))
        .body(Full::new(body))?)
}

/// Stable for identical file metadata, across restarts too.
pub fn generate_etag(mtime: SystemTime, size: u64, name: &str) -> String {
    format!(
        "ss-{}-{}-{}",
        unix_secs(mtime),
        size,
        crc32fast::hash(name.as_bytes())
    )
}

/// `If-None-Match` wins when present; otherwise `If-Modified-Since` is
/// compared at one-second resolution.
pub fn is_resource_modified(
    req_headers: &http::HeaderMap,
    etag: &str,
    last_modified: SystemTime,
) -> bool {
    if let Some(value) = req_headers.get(header::IF_NONE_MATCH) {
        let Ok(value) = value.to_str() else {
            return true;
        };
        return !value
            .split(',')
            .map(str::trim)
            .any(|tag| tag == "*" || unquote(tag) == etag);
    }

    let since = req_headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| httpdate::parse_http_date(v).ok());
    match since {
        Some(since) => UNIX_EPOCH + Duration::from_secs(unix_secs(last_modified)) > since,
        None => true,
    }
}

fn unquote(tag: &str) -> &str {
    tag.trim_start_matches("W/").trim_matches('"')
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}
