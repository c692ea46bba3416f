// SPDX-License-Identifier: LGPL-3.0-only
//! MIME type detection with override table for edge cases.

use std::path::Path;

/// MIME type detector that uses mime_guess2 as primary source with override table.
pub struct MimeDetector;

impl MimeDetector {
    /// Extensions mime_guess2 maps poorly, or not at all.
    const MIME_OVERRIDES: &'static [(&'static str, &'static str)] = &[
        ("toml", "text/x-toml"),
        ("rs", "text/x-rust"),
        ("desktop", "application/x-desktop"),
        ("appimage", "application/vnd.appimage"),
        ("lnk", "application/x-ms-shortcut"),
    ];

    /// Detect MIME type from a file path (by name only).
    ///
    /// Returns None if detection fails or only yields `application/octet-stream`.
    pub fn detect_mime_type(path: &Path) -> Option<String> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        Self::detect_mime_type_from_ext(ext)
    }

    /// Detect MIME type from a file extension.
    pub fn detect_mime_type_from_ext(ext: &str) -> Option<String> {
        let ext_lower = ext.to_lowercase();

        if let Some((_, mime_type)) = Self::MIME_OVERRIDES
            .iter()
            .find(|(override_ext, _)| *override_ext == ext_lower)
        {
            log::debug!("MimeDetector: Using override for extension '{}': {}", ext, mime_type);
            return Some(mime_type.to_string());
        }

        let mime_str = mime_guess2::from_ext(&ext_lower)
            .first_or_octet_stream()
            .to_string();

        // "application/octet-stream" says nothing about the icon
        if mime_str == "application/octet-stream" {
            log::debug!("MimeDetector: Got generic octet-stream for extension '{}', returning None", ext);
            None
        } else {
            Some(mime_str)
        }
    }
}
