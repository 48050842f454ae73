use super::*;

#[test]
fn parses_mount_with_defaults() {
    let cfg = HttpServer::from_yaml_str(
        "bind: \"127.0.0.1:8000\"\nmounts:\n  - prefix: /static\n    root: ./public\n",
    )
    .unwrap();
    let mount = &cfg.mounts[0];
    assert!(mount.hash_paths);
    assert!(mount.cache);
    assert_eq!(mount.cache_timeout, 43200);
    assert_eq!(mount.fallback_mimetype, "text/plain");
    assert_eq!(mount.disallow, None);
    assert_eq!(mount.normalized_prefix(), "/static/");
}

#[test]
fn parses_full_mount() {
    let cfg = HttpServer::from_yaml_str(
        r#"
bind: "0.0.0.0:8080"
mounts:
  - prefix: /assets/
    root: ./dist
    hash_paths: false
    disallow: "*.map"
    cache: false
    cache_timeout: 60
    fallback_mimetype: application/octet-stream
    mimetypes:
      .jsx: text/jsx
"#,
    )
    .unwrap();
    let mount = &cfg.mounts[0];
    assert!(!mount.hash_paths);
    assert!(!mount.cache);
    assert_eq!(mount.disallow.as_deref(), Some("*.map"));
    assert_eq!(mount.mimetypes.get(".jsx").map(String::as_str), Some("text/jsx"));
}

#[test]
fn rejects_bad_configs() {
    let cases = [
        "bind: \"\"\nmounts:\n  - root: ./a\n",
        "bind: \":80\"\nmounts: []\n",
        "bind: \":80\"\nmounts:\n  - root: \"\"\n",
        "bind: \":80\"\nmounts:\n  - prefix: static\n    root: ./a\n",
        "bind: \":80\"\nmounts:\n  - prefix: /a\n    root: ./a\n  - prefix: /a/\n    root: ./b\n",
    ];
    for raw in cases {
        assert!(
            matches!(HttpServer::from_yaml_str(raw), Err(ConfigError::Invalid(_))),
            "accepted {raw:?}"
        );
    }
}

#[test]
fn rejects_cache_timeout_past_one_year() {
    let raw = format!(
        "bind: \":80\"\nmounts:\n  - root: ./a\n    cache_timeout: {}\n",
        mount::MAX_CACHE_TIMEOUT + 1
    );
    assert!(matches!(HttpServer::from_yaml_str(&raw), Err(ConfigError::Invalid(_))));

    let raw = format!(
        "bind: \":80\"\nmounts:\n  - root: ./a\n    cache_timeout: {}\n",
        mount::MAX_CACHE_TIMEOUT
    );
    assert!(HttpServer::from_yaml_str(&raw).is_ok());
}

#[test]
fn yaml_errors_are_reported() {
    assert!(matches!(
        HttpServer::from_yaml_str("bind: [unterminated"),
        Err(ConfigError::Yaml(_))
    ));
}
