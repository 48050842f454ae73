use crate::build::mount::{SmartStatic, build_mount};
use crate::config::error::ConfigError;
use crate::config::http_server::HttpServer;

#[derive(Debug, Clone)]
pub struct BuiltHttpServer {
    pub bind: String,
    /// Longest prefix first, so nested mounts shadow their parents.
    pub mounts: Vec<SmartStatic>,
}

impl BuiltHttpServer {
    /// The mount serving `path`, and the remainder of `path` under its prefix.
    /// The bare prefix without its trailing `/` maps to an empty remainder.
    pub fn find_mount<'a>(&self, path: &'a str) -> Option<(&SmartStatic, &'a str)> {
        self.mounts.iter().find_map(|mount| {
            let prefix = mount.prefix();
            match path.strip_prefix(prefix) {
                Some(rest) => Some((mount, rest)),
                None if path == prefix.trim_end_matches('/') => Some((mount, "")),
                None => None,
            }
        })
    }
}

pub fn build_http_server(cfg: HttpServer) -> Result<BuiltHttpServer, ConfigError> {
    cfg.validate()?;
    let mut mounts = cfg
        .mounts
        .iter()
        .map(build_mount)
        .collect::<Result<Vec<_>, _>>()?;
    mounts.sort_by_key(|mount| std::cmp::Reverse(mount.prefix().len()));
    Ok(BuiltHttpServer {
        bind: cfg.bind,
        mounts,
    })
}
