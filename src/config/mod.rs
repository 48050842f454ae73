pub mod error;
pub mod http_server;
pub mod mount;

pub use error::ConfigError;
pub use http_server::HttpServer;
pub use mount::MountConfig;

#[cfg(test)]
mod tests;
