// SPDX-License-Identifier: LGPL-3.0-only
use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of a cached icon.
///
/// Entries shown in a file list are keyed by their path. Type icons that only
/// depend on a file extension use a separate key space so they can never
/// collide with a real file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IconKey {
    /// A filesystem entry.
    Path(PathBuf),
    /// A lower-cased file extension without the leading dot.
    Extension(String),
}

impl IconKey {
    /// Key for a filesystem entry.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Key for the type icon of an extension. Case and a leading dot are ignored.
    pub fn extension(extension: &str) -> Self {
        Self::Extension(extension.trim_start_matches('.').to_ascii_lowercase())
    }

    /// The path of a filesystem key.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Extension(_) => None,
        }
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Extension(ext) => write!(f, "*.{}", ext),
        }
    }
}

impl From<PathBuf> for IconKey {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for IconKey {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}
