//! Content-addressed static asset serving.
//!
//! Files are served with conditional-GET support, and mounts can require a
//! content hash in every asset URL (`/static/site.0123456789ab.css`).
//! Stylesheets are rewritten so the assets they reference carry hashes too.

pub mod build;
pub mod cache;
pub mod config;
pub mod css;
pub mod handler;
pub mod loader;
pub mod server;
pub mod util;
