#![warn(missing_docs)]

//! Asynchronous, size-bounded icon buffer for file lists.
//!
//! Icons are extracted on a background worker and materialized lazily on the
//! interactive thread, so drawing a list never waits on the disk.

pub use vello::peniko as color;

pub use iconbuf_core as core;
pub use iconbuf_services as services;

/// A "prelude" for users of iconbuf.
///
/// Importing this module brings into scope the most common types
/// needed to show icons for a list of files.
///
/// ```rust
/// use iconbuf::prelude::*;
/// ```
pub mod prelude {
    // Buffer
    pub use crate::core::{
        BufferConfig, BufferError, IconBuffer, IconKey, ReadyProbe, RenderableIcon, SizeClass, WorkItem,
        BUFFER_SIZE_MAX,
    };

    // Icon sources
    pub use crate::services::filesystem::{FileEntry, FileType};
    pub use crate::services::settings::SettingsRegistry;
    pub use crate::services::{
        BuiltinIcons, FileIconLoader, IconLoader, IconLoaderHandle, IconRegistry, RawIcon, StockIcons, Thumbnailer,
    };
}
