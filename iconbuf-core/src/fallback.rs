// SPDX-License-Identifier: LGPL-3.0-only
//! Ordered fallback picking the icon for one work item.
//!
//! 1. Thumbnail, for medium and large icons of entries that have one.
//! 2. The entry's own file icon.
//! 3. The type icon registered for the entry's template name.
//! 4. The generic file icon, which always exists.
//!
//! The first step producing a non-empty icon wins. Small icons of most
//! extensions look the same for every file, so for those step 3 is tried
//! before touching the file at all.

use iconbuf_services::{IconLoader, RawIcon, StockIcons};

use crate::size::SizeClass;

/// Extensions whose icon depends on file content and always needs full
/// per-file resolution.
pub const EXCLUDED_EXTENSIONS: &[&str] = &["exe", "lnk", "ico", "ani", "cur", "msc", "scr", "desktop", "appimage"];

/// Whether a small icon for `extension` can come from the type icon alone.
pub fn is_type_icon_extension(extension: Option<&str>) -> bool {
    match extension {
        Some(ext) if !ext.is_empty() => !EXCLUDED_EXTENSIONS.iter().any(|excluded| ext.eq_ignore_ascii_case(excluded)),
        _ => false,
    }
}

/// Pick the icon for an entry at `size`.
pub fn select_icon(loader: &dyn IconLoader, fallback_name: &str, size: SizeClass, stock: &dyn StockIcons) -> RawIcon {
    let pixel_size = size.pixel_size();
    let usable = |icon: &RawIcon| !icon.is_empty();

    if size.wants_thumbnail() && loader.has_thumbnail() {
        if let Some(icon) = loader.thumbnail(pixel_size).filter(usable) {
            return icon;
        }
    }

    let type_icon_first = size == SizeClass::Small && is_type_icon_extension(loader.extension().as_deref());
    if type_icon_first {
        if let Some(icon) = stock.template_icon(fallback_name, pixel_size).filter(usable) {
            return icon;
        }
    }

    if let Some(icon) = loader.file_icon(pixel_size).filter(usable) {
        return icon;
    }

    if !type_icon_first {
        if let Some(icon) = stock.template_icon(fallback_name, pixel_size).filter(usable) {
            return icon;
        }
    }

    log::debug!("Fallback: Using generic file icon for {}", fallback_name);
    stock.generic_file_icon(pixel_size)
}

/// Type icon for a bare extension, falling back to the generic file icon.
pub fn select_type_icon(extension: &str, size: SizeClass, stock: &dyn StockIcons) -> RawIcon {
    let pixel_size = size.pixel_size();
    let template_name = iconbuf_services::filesystem::entry::template_name_for(Some(extension));
    stock
        .template_icon(&template_name, pixel_size)
        .filter(|icon| !icon.is_empty())
        .unwrap_or_else(|| stock.generic_file_icon(pixel_size))
}
