//! Process-lived cache of content hashes and rewritten stylesheets.
//!
//! Entries are never invalidated: assets are treated as immutable once
//! deployed, so a file edited in place keeps its first hash until restart.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct HashCache {
    path_hashes: RwLock<HashMap<String, String>>,
    contents: RwLock<HashMap<String, String>>,
}

impl HashCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_hash(&self, path: &str) -> Option<String> {
        self.path_hashes.read().get(path).cloned()
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.contents.read().get(path).cloned()
    }

    /// Read-through lookup of a logical path's hash.
    ///
    /// `compute` runs without any lock held, so two requests missing at the
    /// same time may both compute. Whichever stores first wins and both
    /// observe the stored value. `Ok(None)` from `compute` (missing file) is
    /// not cached.
    pub async fn get_or_compute_hash<F, Fut, E>(&self, path: &str, compute: F) -> Result<Option<String>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<String>, E>>,
    {
        if let Some(hash) = self.path_hash(path) {
            return Ok(Some(hash));
        }
        let Some(hash) = compute().await? else {
            return Ok(None);
        };
        let mut map = self.path_hashes.write();
        Ok(Some(map.entry(path.to_string()).or_insert(hash).clone()))
    }

    /// Read-through lookup of a stylesheet's rewritten text.
    pub async fn get_or_compute_contents<F, Fut, E>(&self, path: &str, compute: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(text) = self.contents(path) {
            return Ok(text);
        }
        let text = compute().await?;
        let mut map = self.contents.write();
        Ok(map.entry(path.to_string()).or_insert(text).clone())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.path_hashes.read().len()
    }
}
