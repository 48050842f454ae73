use std::time::{Duration, SystemTime};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, http};

pub fn make_error_resp(status: http::StatusCode, msg: &str) -> http::Response<Full<Bytes>> {
    let mut resp = http::Response::new(Full::from(msg.to_string()));
    *resp.status_mut() = status;
    let headers = resp.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    if let Ok(date) = header::HeaderValue::from_str(&http_date(SystemTime::now())) {
        headers.insert(header::DATE, date);
    }
    resp
}

/// Last second `httpdate` can render, 9999-12-31T23:59:59Z.
const MAX_HTTP_DATE_SECS: u64 = 253_402_300_799;

/// IMF-fixdate, clamped to the range `httpdate` can render.
pub fn http_date(time: SystemTime) -> String {
    let latest = SystemTime::UNIX_EPOCH + Duration::from_secs(MAX_HTTP_DATE_SECS);
    httpdate::fmt_http_date(time.clamp(SystemTime::UNIX_EPOCH, latest))
}
