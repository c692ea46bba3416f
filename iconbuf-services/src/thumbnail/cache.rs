// SPDX-License-Identifier: LGPL-3.0-only
//! Cache path computation and freshness checks for thumbnails.
//!
//! Paths follow the freedesktop.org Thumbnail Managing Standard, so
//! thumbnails written by other desktop applications are picked up.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the size directory holding thumbnails for `size` pixels.
///
/// `normal` holds 128px, `large` 256px, `x-large` 512px and `xx-large`
/// 1024px thumbnails.
pub fn thumbnail_flavor(size: u32) -> &'static str {
    match size {
        0..=128 => "normal",
        129..=256 => "large",
        257..=512 => "x-large",
        _ => "xx-large",
    }
}

/// Default root of the thumbnail cache: `~/.cache/thumbnails`.
pub fn default_thumbnail_root() -> Option<PathBuf> {
    dirs::cache_dir().map(|cache| cache.join("thumbnails"))
}

/// Compute the cache directory for thumbnails of a given size.
pub fn thumbnail_cache_dir(root: &Path, size: u32) -> PathBuf {
    root.join(thumbnail_flavor(size))
}

/// Compute the cache path for a thumbnail of `file`.
///
/// The filename is `{md5(file_uri)}.png`.
pub fn thumbnail_cache_path(root: &Path, file: &Path, size: u32) -> PathBuf {
    let uri = file_uri(file);
    thumbnail_cache_dir(root, size).join(format!("{}.png", file_uri_to_md5(&uri)))
}

/// Convert a file path to a `file://` URI.
///
/// The path is made absolute and every component is percent-encoded;
/// separators stay as `/`.
pub fn file_uri(path: &Path) -> String {
    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };

    let mut uri = String::from("file://");
    for component in absolute_path.components() {
        if let Component::Normal(part) = component {
            uri.push('/');
            uri.push_str(&urlencoding::encode(&part.to_string_lossy()));
        }
    }
    if uri.len() == "file://".len() {
        uri.push('/');
    }
    uri
}

/// MD5 hash of a file URI as lowercase hex.
pub fn file_uri_to_md5(uri: &str) -> String {
    let digest = md5::compute(uri.as_bytes());
    format!("{:x}", digest)
}

/// Check that a thumbnail exists and is not older than the file it shows.
pub fn is_thumbnail_fresh(thumbnail_path: &Path, file_path: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|m| m.modified()).ok();

    match (modified(thumbnail_path), modified(file_path)) {
        (Some(thumbnail_mtime), Some(file_mtime)) => thumbnail_mtime >= file_mtime,
        _ => false,
    }
}
