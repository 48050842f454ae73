//! Resolution of logical paths to files on disk.
//!
//! A mount picks one loader when it is built: a directory tree, or a single
//! file served for every path under the prefix.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub enum Loader {
    Directory(PathBuf),
    File(PathBuf),
}

/// A resolved file that has not been opened yet.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub name: String,
    pub path: PathBuf,
}

/// An opened file. The handle closes when this is dropped, which covers the
/// 304 short-circuit and every error path.
#[derive(Debug)]
pub struct File {
    pub handle: tokio::fs::File,
    pub name: String,
    pub mtime: SystemTime,
    pub size: u64,
    pub mimetype: String,
}

impl Loader {
    pub fn for_root(root: &Path) -> io::Result<Self> {
        let root = root.canonicalize()?;
        if root.is_file() {
            Ok(Loader::File(root))
        } else {
            Ok(Loader::Directory(root))
        }
    }

    pub fn root(&self) -> &Path {
        match self {
            Loader::Directory(dir) => dir,
            Loader::File(file) => file,
        }
    }

    /// `logical_path` must already be sanitized. Anything that is not a
    /// regular file resolves to `None`.
    pub async fn resolve(&self, logical_path: &str) -> Option<FileSource> {
        let path = match self {
            Loader::Directory(dir) => dir.join(logical_path.trim_start_matches('/')),
            Loader::File(file) => file.clone(),
        };
        let meta = tokio::fs::metadata(&path).await.ok()?;
        if !meta.is_file() {
            return None;
        }
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(FileSource { name, path })
    }
}

impl FileSource {
    pub async fn open(self, mimetype: String) -> io::Result<File> {
        let handle = tokio::fs::File::open(&self.path).await?;
        let meta = handle.metadata().await?;
        Ok(File {
            handle,
            name: self.name,
            mtime: meta.modified()?,
            size: meta.len(),
            mimetype,
        })
    }
}
