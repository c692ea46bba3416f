// SPDX-License-Identifier: LGPL-3.0-only
//! Icon lookup system with search paths and inheritance.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::icon::error::IconError;
use crate::icon::theme::{IconContext, IconTheme};

/// Formats tried for every candidate, in order of preference.
/// Vector icons are skipped since icons are handed out as pixel buffers.
const EXTENSIONS: [&str; 2] = ["png", "ico"];

/// Icon lookup system.
pub struct IconLookup {
    /// Cache of loaded themes; `None` remembers themes that do not exist.
    theme_cache: Mutex<HashMap<String, Option<IconTheme>>>,
    /// Search paths for icon themes.
    search_paths: Vec<PathBuf>,
    /// Directories holding unthemed icons (`/usr/share/pixmaps`).
    pixmap_paths: Vec<PathBuf>,
}

impl IconLookup {
    /// Create a lookup over the standard XDG search paths.
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // User-specific paths
        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".icons"));
        }
        if let Some(data) = dirs::data_dir() {
            search_paths.push(data.join("icons"));
        }

        // System-wide paths
        let data_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|dirs| !dirs.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
        for dir in data_dirs.split(':').filter(|d| !d.is_empty()) {
            let icons = PathBuf::from(dir).join("icons");
            if !search_paths.contains(&icons) {
                search_paths.push(icons);
            }
        }

        Self::with_search_paths(search_paths, vec![PathBuf::from("/usr/share/pixmaps")])
    }

    /// Create a lookup over explicit search paths.
    pub fn with_search_paths(search_paths: Vec<PathBuf>, pixmap_paths: Vec<PathBuf>) -> Self {
        Self {
            theme_cache: Mutex::new(HashMap::new()),
            search_paths,
            pixmap_paths,
        }
    }

    /// Search paths in priority order.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Load a theme (with caching).
    pub fn load_theme(&self, theme_name: &str) -> Result<IconTheme, IconError> {
        let mut cache = self.theme_cache.lock();

        if let Some(cached) = cache.get(theme_name) {
            return cached
                .clone()
                .ok_or_else(|| IconError::ThemeNotFound(theme_name.to_string()));
        }

        for search_path in &self.search_paths {
            let theme_path = search_path.join(theme_name);
            if !theme_path.join("index.theme").is_file() {
                continue;
            }
            match IconTheme::load(theme_name, theme_path) {
                Ok(theme) => {
                    log::debug!("IconLookup: Loaded theme '{}' from {:?}", theme_name, theme.base_path);
                    cache.insert(theme_name.to_string(), Some(theme.clone()));
                    return Ok(theme);
                },
                // A broken index.theme is reported, not skipped
                Err(err @ IconError::IndexParseError(_)) => return Err(err),
                Err(err) => {
                    log::debug!("IconLookup: Skipping theme '{}' in {:?}: {}", theme_name, search_path, err);
                },
            }
        }

        cache.insert(theme_name.to_string(), None);
        Err(IconError::ThemeNotFound(theme_name.to_string()))
    }

    /// Lookup an icon in a theme, its inherited themes, hicolor and finally
    /// the unthemed pixmap directories.
    pub fn lookup_icon(&self, icon_name: &str, size: u32, theme_name: &str) -> Option<PathBuf> {
        let context = IconContext::for_icon_name(icon_name);
        let mut visited = HashSet::new();

        if let Some(path) = self.lookup_in_chain(icon_name, size, context, theme_name, &mut visited) {
            return Some(path);
        }

        if !visited.contains("hicolor") {
            log::debug!("IconLookup: Falling back to hicolor theme for '{}'", icon_name);
            if let Some(path) = self.lookup_in_chain(icon_name, size, context, "hicolor", &mut visited) {
                return Some(path);
            }
        }

        let unthemed = self.lookup_unthemed(icon_name);
        if unthemed.is_none() {
            log::debug!("IconLookup: Icon '{}' not found in any theme", icon_name);
        }
        unthemed
    }

    fn lookup_in_chain(
        &self,
        icon_name: &str,
        size: u32,
        context: IconContext,
        theme_name: &str,
        visited: &mut HashSet<String>,
    ) -> Option<PathBuf> {
        // Inheritance graphs may contain cycles
        if !visited.insert(theme_name.to_string()) {
            return None;
        }

        let theme = self.load_theme(theme_name).ok()?;
        if let Some(path) = Self::lookup_in_theme(&theme, icon_name, size, context) {
            log::debug!("IconLookup: Found icon '{}' in theme '{}' at {:?}", icon_name, theme_name, path);
            return Some(path);
        }

        theme
            .inherits
            .iter()
            .find_map(|parent| self.lookup_in_chain(icon_name, size, context, parent, visited))
    }

    /// Lookup icon in a specific theme, best matching directory first.
    fn lookup_in_theme(theme: &IconTheme, icon_name: &str, size: u32, context: IconContext) -> Option<PathBuf> {
        theme
            .ranked_directories(size, context)
            .into_iter()
            .find_map(|dir| {
                let dir_path = theme.directory_path(&dir.name);
                EXTENSIONS
                    .iter()
                    .map(|ext| dir_path.join(format!("{}.{}", icon_name, ext)))
                    .find(|path| path.is_file())
            })
    }

    fn lookup_unthemed(&self, icon_name: &str) -> Option<PathBuf> {
        self.pixmap_paths.iter().find_map(|dir| {
            EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{}.{}", icon_name, ext)))
                .find(|path| path.is_file())
        })
    }
}

impl Default for IconLookup {
    fn default() -> Self {
        Self::new()
    }
}
