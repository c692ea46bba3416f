// SPDX-License-Identifier: LGPL-3.0-only
//! The [`IconBuffer`] facade.
//!
//! A buffer belongs to the interactive thread. The UI tells it which entries
//! are about to be shown with [`IconBuffer::set_workload`] and asks for icons
//! with [`IconBuffer::retrieve`], which never blocks: a miss schedules the
//! entry with priority and returns `None` until the worker has produced it.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use iconbuf_core::{BufferConfig, IconBuffer, IconKey, SizeClass, WorkItem};
//! use iconbuf_services::{BuiltinIcons, IconLoader, RawIcon};
//!
//! struct Document;
//!
//! impl IconLoader for Document {
//!     fn file_icon(&self, pixel_size: u32) -> Option<RawIcon> {
//!         Some(RawIcon::document(pixel_size))
//!     }
//! }
//!
//! let mut buffer =
//!     IconBuffer::with_config(SizeClass::Small, BufferConfig::default(), Arc::new(BuiltinIcons)).unwrap();
//! let item = WorkItem::new(IconKey::path("/tmp/notes.txt"), Arc::new(Document), "template.txt");
//!
//! buffer.set_workload(vec![item.clone()]);
//! // `None` until the worker is done; ask again on the next frame
//! let icon = buffer.retrieve(&item);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use iconbuf_services::icon::default_registry;
use iconbuf_services::settings::Config;
use iconbuf_services::{IconRegistry, StockIcons};

use crate::cache::{CacheWriter, IconCache};
use crate::config::BufferConfig;
use crate::error::BufferError;
use crate::fallback;
use crate::key::IconKey;
use crate::queue::{WorkItem, WorkQueue};
use crate::renderable::RenderableIcon;
use crate::size::SizeClass;
use crate::worker::Worker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StockKind {
    File,
    Directory,
    LinkOverlay,
}

thread_local! {
    static STOCK_ICONS: RefCell<HashMap<(StockKind, SizeClass), RenderableIcon>> = RefCell::new(HashMap::new());
}

fn stock_icon(kind: StockKind, size: SizeClass) -> RenderableIcon {
    STOCK_ICONS.with(|icons| {
        icons
            .borrow_mut()
            .entry((kind, size))
            .or_insert_with(|| {
                let registry = default_registry();
                let pixel_size = size.pixel_size();
                let raw = match kind {
                    StockKind::File => registry.generic_file_icon(pixel_size),
                    StockKind::Directory => registry.generic_dir_icon(pixel_size),
                    StockKind::LinkOverlay => registry.link_overlay(pixel_size),
                };
                RenderableIcon::materialize(raw)
            })
            .clone()
    })
}

/// Asynchronous, size-bounded icon cache for one icon size.
///
/// Owns a worker thread that is stopped and joined when the buffer is dropped.
pub struct IconBuffer {
    size: SizeClass,
    config: BufferConfig,
    cache: IconCache,
    queue: Arc<WorkQueue>,
    stock: Arc<dyn StockIcons>,
    worker: Worker,
}

impl IconBuffer {
    /// Create a buffer with the default configuration and the shared icon registry.
    pub fn new(size: SizeClass) -> Result<Self, BufferError> {
        let stock: Arc<dyn StockIcons> = default_registry();
        Self::with_config(size, BufferConfig::default(), stock)
    }

    /// Create a buffer configured from loaded settings.
    ///
    /// A configured icon theme gets its own registry; otherwise the shared
    /// default registry is used.
    pub fn from_settings(size: SizeClass, settings: &Config) -> Result<Self, BufferError> {
        let stock: Arc<dyn StockIcons> = IconRegistry::from_settings(settings);
        Self::with_config(size, BufferConfig::from_settings(settings), stock)
    }

    /// Create a buffer with explicit configuration and stock icon source.
    pub fn with_config(size: SizeClass, config: BufferConfig, stock: Arc<dyn StockIcons>) -> Result<Self, BufferError> {
        let cache = IconCache::new(config.max_entries);
        let queue = Arc::new(WorkQueue::with_poll_interval(config.poll_interval));
        let worker = Worker::spawn(size, queue.clone(), cache.writer(), stock.clone())?;

        Ok(Self {
            size,
            config,
            cache,
            queue,
            stock,
            worker,
        })
    }

    /// Replace all pending requests with `items`, `items[0]` first.
    ///
    /// The list must stay within half the cache capacity so that a full
    /// batch cannot push out icons before they are shown. Longer lists trip
    /// a debug assertion and are truncated to their front in release builds.
    pub fn set_workload(&mut self, mut items: Vec<WorkItem>) {
        let max_workload = self.config.max_workload();
        debug_assert!(
            items.len() <= max_workload,
            "workload of {} items exceeds {}",
            items.len(),
            max_workload
        );
        if items.len() > max_workload {
            log::warn!("IconBuffer: Truncating workload of {} items to {}", items.len(), max_workload);
            items.truncate(max_workload);
        }

        self.queue.push_replace(items);
        self.cache.enforce_limit();
    }

    /// Get the icon for `item` if it is ready.
    ///
    /// On a miss the item is scheduled ahead of all other work and `None` is
    /// returned immediately. Asking again for an item that is still pending
    /// does not queue it twice.
    pub fn retrieve(&mut self, item: &WorkItem) -> Option<RenderableIcon> {
        if let Some(icon) = self.cache.get_and_promote(&item.key) {
            return Some(icon);
        }

        log::trace!("IconBuffer: {} not ready, requesting", item.key);
        self.queue.push_front(item.clone());
        self.cache.enforce_limit();
        None
    }

    /// Whether an icon for `key` is cached.
    pub fn ready(&self, key: &IconKey) -> bool {
        self.cache.contains(key)
    }

    /// A handle answering [`ready`](Self::ready) from any thread.
    pub fn probe(&self) -> ReadyProbe {
        ReadyProbe {
            writer: self.cache.writer(),
        }
    }

    /// Type icon for a file extension, resolved synchronously.
    ///
    /// Results are cached alongside entry icons and count towards the capacity.
    pub fn icon_by_extension(&mut self, extension: &str) -> RenderableIcon {
        let key = IconKey::extension(extension);
        if let Some(icon) = self.cache.get_and_promote(&key) {
            return icon;
        }

        let IconKey::Extension(normalized) = &key else {
            return RenderableIcon::empty();
        };
        let raw = fallback::select_type_icon(normalized, self.size, self.stock.as_ref());
        let icon = RenderableIcon::materialize(raw);
        self.cache.insert_materialized(key, icon.clone());
        self.cache.enforce_limit();
        icon
    }

    /// Evict least recently used icons down to the configured capacity.
    pub fn enforce_limit(&mut self) {
        self.cache.enforce_limit();
    }

    /// Keys of pending requests in the order they will be served.
    pub fn pending_keys(&self) -> Vec<IconKey> {
        self.queue.pending_keys()
    }

    /// The cache backing this buffer.
    pub fn cache(&self) -> &IconCache {
        &self.cache
    }

    /// Whether the worker thread is still running.
    pub fn worker_running(&self) -> bool {
        !self.worker.is_finished()
    }

    /// The size class of icons in this buffer.
    pub fn size_class(&self) -> SizeClass {
        self.size
    }

    /// Edge length of icons in this buffer in pixels.
    pub fn pixel_size(&self) -> u32 {
        self.size.pixel_size()
    }

    /// The active configuration.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Generic file icon of the shared registry, cached per thread.
    pub fn generic_file_icon(size: SizeClass) -> RenderableIcon {
        stock_icon(StockKind::File, size)
    }

    /// Generic folder icon of the shared registry, cached per thread.
    pub fn generic_dir_icon(size: SizeClass) -> RenderableIcon {
        stock_icon(StockKind::Directory, size)
    }

    /// Badge drawn over icons of symbolic links, cached per thread.
    pub fn link_overlay_icon(size: SizeClass) -> RenderableIcon {
        stock_icon(StockKind::LinkOverlay, size)
    }
}

impl Drop for IconBuffer {
    fn drop(&mut self) {
        log::debug!("IconBuffer: Shutting down {:?} buffer", self.size);
        self.worker.shutdown();
    }
}

/// Thread-safe readiness probe for an [`IconBuffer`].
#[derive(Clone)]
pub struct ReadyProbe {
    writer: CacheWriter,
}

impl ReadyProbe {
    /// Whether an icon for `key` is cached.
    pub fn ready(&self, key: &IconKey) -> bool {
        self.writer.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconbuf_services::{BuiltinIcons, RawIcon};

    struct Templates;

    impl StockIcons for Templates {
        fn template_icon(&self, template_name: &str, pixel_size: u32) -> Option<RawIcon> {
            (template_name == "template.pdf").then(|| RawIcon::folder(pixel_size))
        }
    }

    #[test]
    fn test_icon_by_extension_is_cached() {
        let mut buffer = IconBuffer::with_config(SizeClass::Small, BufferConfig::default(), Arc::new(Templates)).unwrap();

        let pdf = buffer.icon_by_extension("PDF");
        assert_eq!((pdf.width(), pdf.height()), (16, 16));
        assert!(buffer.ready(&IconKey::extension("pdf")));
        assert_eq!(buffer.icon_by_extension(".pdf"), pdf);

        let unknown = buffer.icon_by_extension("zzz");
        assert!(!unknown.is_empty());
        assert_eq!(buffer.cache().len(), 2);
    }

    #[test]
    fn test_static_accessors_are_cached_per_thread() {
        let file = IconBuffer::generic_file_icon(SizeClass::Medium);
        assert!(!file.is_empty());
        assert!(file.width() <= SizeClass::MEDIUM_PX);
        assert_eq!(IconBuffer::generic_file_icon(SizeClass::Medium), file);
        assert!(!IconBuffer::generic_dir_icon(SizeClass::Small).is_empty());
        assert!(!IconBuffer::link_overlay_icon(SizeClass::Small).is_empty());
    }

    #[test]
    fn test_from_settings() {
        let settings = Config::from_toml("[buffer]\nmax_entries = 10\n[icons]\ntheme = \"X\"").unwrap();
        let buffer = IconBuffer::from_settings(SizeClass::Medium, &settings).unwrap();
        assert_eq!(buffer.config().max_entries, 10);
        assert_eq!(buffer.config().max_workload(), 5);
        assert_eq!(IconRegistry::from_settings(&settings).theme(), "X");
        assert!(buffer.worker_running());
    }

    #[test]
    fn test_accessors() {
        let config = BufferConfig::default().with_max_entries(10);
        let buffer = IconBuffer::with_config(SizeClass::Large, config, Arc::new(BuiltinIcons)).unwrap();
        assert_eq!(buffer.size_class(), SizeClass::Large);
        assert_eq!(buffer.pixel_size(), 128);
        assert_eq!(buffer.config().max_entries, 10);
        assert!(buffer.pending_keys().is_empty());
    }
}
