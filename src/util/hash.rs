use md5::{Digest, Md5};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::path::basename;

/// Number of hex characters kept from the digest.
pub const HASH_LEN: usize = 12;

const CHUNK_SIZE: usize = 1024;

/// Digest a stream in fixed-size chunks so large files never sit in memory.
pub async fn hash_reader<R>(reader: &mut R) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut hasher = Md5::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(truncate_digest(&hasher.finalize()))
}

pub fn hash_bytes(data: &[u8]) -> String {
    truncate_digest(&Md5::digest(data))
}

fn truncate_digest(digest: &[u8]) -> String {
    let mut hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex.truncate(HASH_LEN);
    hex
}

pub fn is_hash(s: &str) -> bool {
    s.len() == HASH_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Split a file name into stem and extension. Leading dots belong to the
/// stem, so `.htaccess` has no extension.
pub fn split_ext(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].bytes().any(|b| b != b'.') => name.split_at(idx),
        _ => (name, ""),
    }
}

fn split_dir(path: &str) -> (&str, &str) {
    let name = basename(path);
    path.split_at(path.len() - name.len())
}

/// `/css/site.css` + `0123456789ab` -> `/css/site.0123456789ab.css`
pub fn add_hash_to_filepath(path: &str, hash: &str) -> String {
    let (dir, name) = split_dir(path);
    let (stem, ext) = split_ext(name);
    format!("{dir}{stem}.{hash}{ext}")
}

/// Inverse of [`add_hash_to_filepath`]: returns the unhashed path and the
/// embedded hash, or `None` when the name carries no hash segment.
pub fn parse_hashed_filepath(path: &str) -> Option<(String, String)> {
    let (dir, name) = split_dir(path);
    let (stem, ext) = split_ext(name);

    let (before, tail) = split_ext(stem);
    if let Some(hash) = tail.strip_prefix('.').filter(|h| is_hash(h)) {
        return Some((format!("{dir}{before}{ext}"), hash.to_string()));
    }

    // extensionless files carry the hash as their only extension
    ext.strip_prefix('.')
        .filter(|h| is_hash(h))
        .map(|hash| (format!("{dir}{stem}"), hash.to_string()))
}
