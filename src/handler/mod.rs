pub mod conditional;
pub mod smart;
pub mod r#static;

use std::io;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, http};
use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::build::http_server::BuiltHttpServer;
use crate::util::http::make_error_resp;

pub use conditional::{CachePolicy, ConditionalResponder, Freshness};
pub use smart::CacheBustingHandler;
pub use r#static::StaticHandler;

pub type Response = http::Response<Full<Bytes>>;

/// `NotFound` is the only error clients are meant to see; every other
/// variant ends the request as a server failure.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("not found")]
    NotFound,
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("stylesheet `{0}` is not valid UTF-8")]
    InvalidUtf8(String),
    #[error("failed to build response: {0}")]
    Http(#[from] http::Error),
}

/// Dispatch a request to the mount whose prefix matches its path.
pub async fn handle_request<B>(server: &BuiltHttpServer, req: http::Request<B>) -> Response {
    let (parts, _) = req.into_parts();
    let method = parts.method;
    if method != http::Method::GET && method != http::Method::HEAD {
        let mut resp = make_error_resp(http::StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
        resp.headers_mut()
            .insert(header::ALLOW, header::HeaderValue::from_static("GET, HEAD"));
        return resp;
    }

    let path = parts.uri.path();
    let Some((mount, rest)) = server.find_mount(path) else {
        return make_error_resp(http::StatusCode::NOT_FOUND, "404 Not Found");
    };
    let filepath = percent_decode_str(rest).decode_utf8_lossy();

    let resp = match mount.handler().get(&filepath, &parts.headers).await {
        Ok(resp) => resp,
        Err(ServeError::NotFound) => make_error_resp(http::StatusCode::NOT_FOUND, "404 Not Found"),
        Err(err) => {
            log::error!("[server] {method} {path} failed: {err}");
            make_error_resp(http::StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
        }
    };
    log::info!("[server] {method} {path} -> {}", resp.status().as_u16());

    if method == http::Method::HEAD {
        let (parts, _) = resp.into_parts();
        return http::Response::from_parts(parts, Full::default());
    }
    resp
}
