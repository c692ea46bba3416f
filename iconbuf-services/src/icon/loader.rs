// SPDX-License-Identifier: LGPL-3.0-only
//! Decoder for raster icon files (PNG, ICO, BMP).

use std::fs;
use std::path::Path;

use crate::icon::error::IconError;
use crate::raw::RawIcon;

/// Icon files larger than this are not worth decoding for a list icon.
const MAX_ICON_FILE_BYTES: u64 = 4 * 1024 * 1024;

/// Loads icon files into [`RawIcon`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct IconFileLoader;

impl IconFileLoader {
    /// Create a new icon file loader.
    pub fn new() -> Self {
        Self
    }

    /// Load an icon file and scale it down to `size` pixels.
    pub fn load_icon(&self, path: &Path, size: u32) -> Result<RawIcon, IconError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if !matches!(extension.as_str(), "png" | "ico" | "bmp") {
            return Err(IconError::InvalidFormat(format!("Unsupported icon format: {}", extension)));
        }

        let metadata = fs::metadata(path)?;
        if metadata.len() > MAX_ICON_FILE_BYTES {
            return Err(IconError::InvalidFormat(format!(
                "Icon file too large: {} bytes",
                metadata.len()
            )));
        }

        let bytes = fs::read(path)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| IconError::InvalidFormat(format!("Failed to decode {:?}: {}", path, e)))?;

        let icon = RawIcon::from_image(&image);
        if icon.is_empty() {
            return Err(IconError::InvalidFormat(format!("Empty image: {:?}", path)));
        }
        Ok(icon.scaled_to(size))
    }
}
