// SPDX-License-Identifier: LGPL-3.0-only
//! Icon sources for the icon buffer: raw pixel buffers, per-entry icon
//! loaders, XDG icon themes, freedesktop thumbnails and settings.
pub mod filesystem;
pub mod icon;
pub mod loader;
pub mod raw;
pub mod settings;
pub mod thumbnail;

// Re-export commonly used types
pub use icon::{IconError, IconRegistry};
pub use loader::{BuiltinIcons, FileIconLoader, IconLoader, IconLoaderHandle, StockIcons};
pub use raw::RawIcon;
pub use thumbnail::Thumbnailer;
