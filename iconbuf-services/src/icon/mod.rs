// SPDX-License-Identifier: LGPL-3.0-only
//! XDG icon theme support.
//!
//! Theme parsing, icon lookup with inheritance, decoding of icon files and
//! the [`IconRegistry`] that ties them together. The registry is the default
//! [`StockIcons`] source of the icon buffer: it resolves type icons from a
//! file extension alone, and falls back to built-in glyphs when the system
//! has no usable theme.

mod error;
mod loader;
mod lookup;
mod theme;

pub use error::IconError;
pub use loader::IconFileLoader;
pub use lookup::IconLookup;
pub use theme::{DirectoryType, IconContext, IconDirectory, IconTheme};

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;

use crate::filesystem::entry::{FileEntry, FileType};
use crate::filesystem::icon::icon_names_for_mime;
use crate::filesystem::mime_detector::MimeDetector;
use crate::loader::StockIcons;
use crate::raw::RawIcon;
use crate::settings::Config;

/// Theme used when no configuration says otherwise.
pub const DEFAULT_THEME: &str = "Adwaita";

/// Number of decoded theme icons kept per registry.
const ICON_CACHE_SIZE: usize = 256;

static DEFAULT_REGISTRY: Lazy<Arc<IconRegistry>> = Lazy::new(|| Arc::new(IconRegistry::new(DEFAULT_THEME)));

/// Shared registry for [`DEFAULT_THEME`] over the standard search paths.
pub fn default_registry() -> Arc<IconRegistry> {
    DEFAULT_REGISTRY.clone()
}

/// Icon registry - resolves icon names, MIME types and file entries to
/// decoded icons.
pub struct IconRegistry {
    /// Current theme name.
    theme: String,
    /// Icon lookup system.
    lookup: IconLookup,
    /// Icon file decoder.
    files: IconFileLoader,
    /// Decoded icons by (name, size); `None` remembers misses.
    cache: Mutex<LruCache<(String, u32), Option<RawIcon>>>,
    /// Result of the one-time theme initialization.
    init: OnceCell<Result<(), String>>,
}

impl IconRegistry {
    /// Create a registry for `theme` over the standard XDG search paths.
    pub fn new(theme: impl Into<String>) -> Self {
        Self::with_lookup(theme, IconLookup::new())
    }

    /// Registry for the theme named in `[icons] theme`, or the shared
    /// [`default_registry`] when none is configured.
    pub fn from_settings(config: &Config) -> Arc<Self> {
        match config.icons.theme.as_deref() {
            Some(theme) => Arc::new(Self::new(theme)),
            None => default_registry(),
        }
    }

    /// Create a registry with an explicit lookup.
    pub fn with_lookup(theme: impl Into<String>, lookup: IconLookup) -> Self {
        let capacity = NonZeroUsize::new(ICON_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            theme: theme.into(),
            lookup,
            files: IconFileLoader::new(),
            cache: Mutex::new(LruCache::new(capacity)),
            init: OnceCell::new(),
        }
    }

    /// Get the current theme name.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Get an icon by name and size.
    pub fn icon(&self, icon_name: &str, size: u32) -> Option<RawIcon> {
        let key = (icon_name.to_string(), size);
        if let Some(cached) = self.cache.lock().get(&key) {
            return cached.clone();
        }

        // Disk access happens outside the cache lock
        let loaded = self
            .lookup
            .lookup_icon(icon_name, size, &self.theme)
            .and_then(|path| match self.files.load_icon(&path, size) {
                Ok(icon) => Some(icon),
                Err(e) => {
                    log::debug!("IconRegistry: Failed to load '{}' from {:?}: {}", icon_name, path, e);
                    None
                },
            });

        self.cache.lock().put(key, loaded.clone());
        loaded
    }

    /// Get the first available icon for a MIME type, specific names first.
    pub fn icon_for_mime(&self, mime_type: &str, size: u32) -> Option<RawIcon> {
        icon_names_for_mime(mime_type)
            .iter()
            .find_map(|name| self.icon(name, size))
    }

    /// Get the type icon registered for a file extension.
    pub fn icon_for_extension(&self, extension: &str, size: u32) -> Option<RawIcon> {
        let mime_type = MimeDetector::detect_mime_type_from_ext(extension)?;
        log::debug!("IconRegistry: Extension '{}' maps to {}", extension, mime_type);
        self.icon_for_mime(&mime_type, size)
    }

    /// Get the icon for a specific file entry.
    ///
    /// Unlike [`Self::icon_for_extension`] this may read the file itself:
    /// `.ico` files are their own icon and `.desktop` files name theirs.
    pub fn icon_for_entry(&self, entry: &FileEntry, size: u32) -> Option<RawIcon> {
        match entry.file_type {
            FileType::Directory => return self.icon("folder", size),
            FileType::Symlink => return self.icon("inode-symlink", size),
            FileType::File | FileType::Other => {},
        }

        match entry.extension().as_deref() {
            Some("ico") => self.files.load_icon(&entry.path, size).ok(),
            Some("desktop") => {
                let icon = desktop_entry_icon(&entry.path)?;
                if icon.is_absolute() {
                    self.files.load_icon(&icon, size).ok()
                } else {
                    self.icon(&icon.to_string_lossy(), size)
                }
            },
            _ => {
                let mime_type = entry.mime_type.as_deref()?;
                self.icon_for_mime(mime_type, size)
            },
        }
    }

    /// Drop all decoded icons.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

impl StockIcons for IconRegistry {
    fn initialize(&self) -> Result<(), IconError> {
        self.init
            .get_or_init(|| match self.lookup.load_theme(&self.theme) {
                Ok(theme) => {
                    log::info!("IconRegistry: Using icon theme '{}' from {:?}", theme.name, theme.base_path);
                    Ok(())
                },
                Err(IconError::ThemeNotFound(name)) => {
                    log::warn!("IconRegistry: Icon theme '{}' not found, using hicolor and built-in icons", name);
                    Ok(())
                },
                Err(e) => Err(e.to_string()),
            })
            .clone()
            .map_err(IconError::InitFailed)
    }

    fn template_icon(&self, template_name: &str, pixel_size: u32) -> Option<RawIcon> {
        let extension = Path::new(template_name).extension()?.to_str()?;
        self.icon_for_extension(extension, pixel_size)
    }

    fn generic_file_icon(&self, pixel_size: u32) -> RawIcon {
        self.icon("text-x-generic", pixel_size)
            .or_else(|| self.icon("unknown", pixel_size))
            .unwrap_or_else(|| RawIcon::document(pixel_size))
    }

    fn generic_dir_icon(&self, pixel_size: u32) -> RawIcon {
        self.icon("folder", pixel_size)
            .unwrap_or_else(|| RawIcon::folder(pixel_size))
    }

    fn link_overlay(&self, pixel_size: u32) -> RawIcon {
        self.icon("emblem-symbolic-link", pixel_size)
            .unwrap_or_else(|| RawIcon::link_badge(pixel_size))
    }
}

/// Read the `Icon=` key of a desktop entry file.
fn desktop_entry_icon(path: &Path) -> Option<PathBuf> {
    let content = std::fs::read_to_string(path).ok()?;
    let mut in_entry = false;
    for line in content.lines().map(str::trim) {
        if line.starts_with('[') {
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if in_entry {
            if let Some(icon) = line.strip_prefix("Icon=") {
                let icon = icon.trim();
                return (!icon.is_empty()).then(|| PathBuf::from(icon));
            }
        }
    }
    None
}
