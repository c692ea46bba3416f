// SPDX-License-Identifier: LGPL-3.0-only
//! Thumbnails for image files.
//!
//! Thumbnails are read from the shared freedesktop.org thumbnail cache when
//! a fresh one exists; otherwise supported images are decoded and scaled in
//! memory. Nothing is written back to the cache.

pub mod cache;
pub mod error;

pub use error::ThumbnailError;

use std::fs;
use std::path::{Path, PathBuf};

use crate::filesystem::entry::FileEntry;
use crate::raw::RawIcon;
use crate::settings::Config;
use crate::thumbnail::cache::{default_thumbnail_root, is_thumbnail_fresh, thumbnail_cache_path};

/// Source images larger than this are not decoded.
const MAX_SOURCE_BYTES: u64 = 32 * 1024 * 1024;

/// One size per cache flavor, `normal` to `xx-large`.
const FLAVOR_SIZES: [u32; 4] = [128, 256, 512, 1024];

/// Produces thumbnails for file entries.
#[derive(Debug, Clone)]
pub struct Thumbnailer {
    /// Root of the freedesktop thumbnail cache, if any.
    cache_root: Option<PathBuf>,
    /// Largest source file that will be decoded.
    max_source_bytes: u64,
}

impl Thumbnailer {
    /// Create a thumbnailer reading from `~/.cache/thumbnails`.
    pub fn new() -> Self {
        Self::with_cache_root(default_thumbnail_root())
    }

    /// Create a thumbnailer with an explicit cache root (`None` disables
    /// the cache lookup).
    pub fn with_cache_root(cache_root: Option<PathBuf>) -> Self {
        Self {
            cache_root,
            max_source_bytes: MAX_SOURCE_BYTES,
        }
    }

    /// Create a thumbnailer for the cache root in `[icons] thumbnail_cache`,
    /// falling back to `~/.cache/thumbnails`.
    pub fn from_settings(config: &Config) -> Self {
        match &config.icons.thumbnail_cache {
            Some(root) => Self::with_cache_root(Some(root.clone())),
            None => Self::new(),
        }
    }

    /// The thumbnail cache root in use.
    pub fn cache_root(&self) -> Option<&Path> {
        self.cache_root.as_deref()
    }

    /// Limit the size of source files that are decoded.
    pub fn with_max_source_bytes(mut self, max_source_bytes: u64) -> Self {
        self.max_source_bytes = max_source_bytes;
        self
    }

    /// Check if thumbnails can be produced for this entry.
    pub fn is_supported(&self, entry: &FileEntry) -> bool {
        entry.is_file()
            && entry
                .mime_type
                .as_deref()
                .is_some_and(|mime| mime.starts_with("image/"))
            && image::ImageFormat::from_path(&entry.path).is_ok()
    }

    /// Whether a thumbnail can be produced, either by decoding the file or
    /// from a fresh cached thumbnail of any size.
    ///
    /// The second case covers files the decoder cannot read, such as
    /// documents and videos thumbnailed by other applications.
    pub fn has_thumbnail(&self, entry: &FileEntry) -> bool {
        if self.is_supported(entry) {
            return true;
        }
        let Some(root) = self.cache_root.as_deref() else {
            return false;
        };
        entry.is_file()
            && FLAVOR_SIZES
                .iter()
                .any(|&size| is_thumbnail_fresh(&thumbnail_cache_path(root, &entry.path, size), &entry.path))
    }

    /// Get a thumbnail no larger than `size` pixels, or `None`.
    pub fn load(&self, entry: &FileEntry, size: u32) -> Option<RawIcon> {
        match self.try_load(entry, size) {
            Ok(icon) => Some(icon),
            Err(e) => {
                log::debug!("Thumbnailer: No thumbnail for {:?}: {}", entry.path, e);
                None
            },
        }
    }

    fn try_load(&self, entry: &FileEntry, size: u32) -> Result<RawIcon, ThumbnailError> {
        if let Some(icon) = self.cache_root.as_deref().and_then(|root| Self::cached(root, &entry.path, size)) {
            log::debug!("Thumbnailer: Cache hit for {:?}", entry.path);
            return Ok(icon);
        }

        if !self.is_supported(entry) {
            return Err(ThumbnailError::UnsupportedFileType(
                entry.mime_type.clone().unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        let len = fs::metadata(&entry.path)?.len();
        if len > self.max_source_bytes {
            return Err(ThumbnailError::TooLarge(len));
        }

        let image = image::open(&entry.path).map_err(|e| ThumbnailError::GenerationFailed(e.to_string()))?;
        let icon = RawIcon::from_image(&image);
        if icon.is_empty() {
            return Err(ThumbnailError::GenerationFailed("empty image".to_string()));
        }
        Ok(icon.scaled_to(size))
    }

    fn cached(root: &Path, file: &Path, size: u32) -> Option<RawIcon> {
        let thumbnail_path = thumbnail_cache_path(root, file, size);
        if !is_thumbnail_fresh(&thumbnail_path, file) {
            return None;
        }
        let bytes = fs::read(&thumbnail_path).ok()?;
        let image = image::load_from_memory(&bytes).ok()?;
        Some(RawIcon::from_image(&image).scaled_to(size)).filter(|icon| !icon.is_empty())
    }
}

impl Default for Thumbnailer {
    fn default() -> Self {
        Self::new()
    }
}
