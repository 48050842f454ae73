/// Normalize a request-supplied path into a logical path.
///
/// Backslashes become `/`, empty, `.` and `..` segments are dropped and the
/// result always carries exactly one leading slash. A hostile path collapses
/// to `/` or a harmless subset of itself, never to something above the root.
pub fn clean_path(raw: &str) -> String {
    let normalized = raw.replace('\\', "/");
    let segments: Vec<&str> = normalized
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
        .collect();
    format!("/{}", segments.join("/"))
}

/// Collapse `.` and `..` in an absolute URL path, the way a browser would.
pub fn normalize_url_path(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            _ => out.push(seg),
        }
    }
    format!("/{}", out.join("/"))
}

/// Everything before the last `/`, or `""` when there is none.
pub fn dirname(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Everything after the last `/`.
pub fn basename(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}
