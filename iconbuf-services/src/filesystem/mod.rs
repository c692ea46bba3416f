// SPDX-License-Identifier: LGPL-3.0-only
//! Filesystem entries and the MIME information needed to pick their icons.

pub mod entry;
pub mod icon;
pub mod mime_detector;

// Re-export public API
pub use entry::{FileEntry, FileType};
pub use icon::icon_names_for_mime;
pub use mime_detector::MimeDetector;
