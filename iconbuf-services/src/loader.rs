// SPDX-License-Identifier: LGPL-3.0-only
//! Icon sources consumed by the icon buffer.
//!
//! Two seams: [`IconLoader`] is the per-entry callback bundle carried by
//! every work item, [`StockIcons`] supplies icons that only depend on a
//! type (template names, generic file and folder icons).

use std::sync::Arc;

use crate::filesystem::entry::FileEntry;
use crate::icon::{IconError, IconRegistry};
use crate::raw::RawIcon;
use crate::thumbnail::Thumbnailer;

/// Per-entry icon source.
///
/// Implementations must be callable from any thread. Every operation may
/// fail silently by returning `None`.
pub trait IconLoader: Send + Sync {
    /// Whether this entry can have a thumbnail at all.
    fn has_thumbnail(&self) -> bool {
        false
    }

    /// Produce a thumbnail no larger than `pixel_size`.
    fn thumbnail(&self, _pixel_size: u32) -> Option<RawIcon> {
        None
    }

    /// Produce the entry's own file-type icon.
    fn file_icon(&self, pixel_size: u32) -> Option<RawIcon>;

    /// Lower-cased extension of the entry, used to skip per-file resolution
    /// for types whose icon does not depend on content.
    fn extension(&self) -> Option<String> {
        None
    }
}

/// Shared, thread-safe handle to an [`IconLoader`].
pub type IconLoaderHandle = Arc<dyn IconLoader>;

/// Type-level icons that do not depend on any particular file.
pub trait StockIcons: Send + Sync {
    /// One-time setup before the first icon is extracted. Must be idempotent.
    fn initialize(&self) -> Result<(), IconError> {
        Ok(())
    }

    /// Icon registered for a synthetic template name such as `template.pdf`.
    fn template_icon(&self, template_name: &str, pixel_size: u32) -> Option<RawIcon>;

    /// Generic file icon; never fails.
    fn generic_file_icon(&self, pixel_size: u32) -> RawIcon {
        RawIcon::document(pixel_size)
    }

    /// Generic folder icon; never fails.
    fn generic_dir_icon(&self, pixel_size: u32) -> RawIcon {
        RawIcon::folder(pixel_size)
    }

    /// Badge drawn over icons of symbolic links; never fails.
    fn link_overlay(&self, pixel_size: u32) -> RawIcon {
        RawIcon::link_badge(pixel_size)
    }
}

/// Stock icons made only of the built-in glyphs.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinIcons;

impl StockIcons for BuiltinIcons {
    fn template_icon(&self, _template_name: &str, _pixel_size: u32) -> Option<RawIcon> {
        None
    }
}

/// [`IconLoader`] for a filesystem entry, backed by the icon theme and the
/// thumbnail cache.
pub struct FileIconLoader {
    entry: FileEntry,
    registry: Arc<IconRegistry>,
    thumbnailer: Arc<Thumbnailer>,
}

impl FileIconLoader {
    /// Create a loader for `entry`.
    pub fn new(entry: FileEntry, registry: Arc<IconRegistry>, thumbnailer: Arc<Thumbnailer>) -> Self {
        Self {
            entry,
            registry,
            thumbnailer,
        }
    }

    /// Create a loader and wrap it into a shareable handle.
    pub fn handle(entry: FileEntry, registry: Arc<IconRegistry>, thumbnailer: Arc<Thumbnailer>) -> IconLoaderHandle {
        Arc::new(Self::new(entry, registry, thumbnailer))
    }

    /// The entry this loader serves.
    pub fn entry(&self) -> &FileEntry {
        &self.entry
    }
}

impl IconLoader for FileIconLoader {
    fn has_thumbnail(&self) -> bool {
        self.thumbnailer.has_thumbnail(&self.entry)
    }

    fn thumbnail(&self, pixel_size: u32) -> Option<RawIcon> {
        self.thumbnailer.load(&self.entry, pixel_size)
    }

    fn file_icon(&self, pixel_size: u32) -> Option<RawIcon> {
        self.registry.icon_for_entry(&self.entry, pixel_size)
    }

    fn extension(&self) -> Option<String> {
        self.entry.extension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::entry::FileType;
    use crate::icon::IconLookup;
    use std::path::PathBuf;

    #[test]
    fn test_builtin_icons_defaults() {
        let stock = BuiltinIcons;
        assert!(stock.initialize().is_ok());
        assert_eq!(stock.template_icon("template.txt", 16), None);
        assert_eq!(stock.generic_file_icon(16), RawIcon::document(16));
    }

    #[test]
    fn test_file_loader_reports_entry_traits() {
        let empty = tempfile::tempdir().unwrap();
        let registry = Arc::new(IconRegistry::with_lookup(
            "none",
            IconLookup::with_search_paths(vec![empty.path().to_path_buf()], Vec::new()),
        ));
        let thumbnailer = Arc::new(Thumbnailer::with_cache_root(None));

        let entry = FileEntry::new(PathBuf::from("/nowhere/Photo.JPG"), FileType::File);
        let loader = FileIconLoader::new(entry, registry.clone(), thumbnailer.clone());
        assert_eq!(loader.extension().as_deref(), Some("jpg"));
        assert!(loader.has_thumbnail());
        assert_eq!(loader.thumbnail(48), None);
        assert_eq!(loader.file_icon(48), None);

        let dir = FileEntry::new(PathBuf::from("/nowhere"), FileType::Directory);
        let loader = FileIconLoader::handle(dir, registry, thumbnailer);
        assert!(!loader.has_thumbnail());
        assert_eq!(loader.extension(), None);
    }
}
