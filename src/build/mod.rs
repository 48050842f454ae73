pub mod http_server;
pub mod mount;

pub use http_server::{BuiltHttpServer, build_http_server};
pub use mount::{LoadedMount, SmartStatic, build_mount};
