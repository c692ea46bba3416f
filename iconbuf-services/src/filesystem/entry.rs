// SPDX-License-Identifier: LGPL-3.0-only
//! File entry type shown in a file list.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::filesystem::mime_detector::MimeDetector;

/// Type of filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link whose target could not be resolved.
    Symlink,
    /// Other type (e.g., device, socket, etc.).
    Other,
}

/// A filesystem entry (file or directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path to the entry.
    pub path: PathBuf,
    /// Name of the entry (file or directory name).
    pub name: String,
    /// Type of the entry. For symbolic links this is the type of the target.
    pub file_type: FileType,
    /// Whether the entry itself is a symbolic link.
    pub is_link: bool,
    /// MIME type guessed from the name (if any).
    pub mime_type: Option<String>,
}

impl FileEntry {
    /// Create a new file entry without touching the disk.
    pub fn new(path: PathBuf, file_type: FileType) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let mime_type = match file_type {
            FileType::Directory => Some("inode/directory".to_string()),
            _ => MimeDetector::detect_mime_type(&path),
        };

        Self {
            path,
            name,
            file_type,
            is_link: false,
            mime_type,
        }
    }

    /// Build an entry from the filesystem, following symbolic links for the
    /// entry type but remembering that the entry was a link.
    pub fn from_path(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let link_metadata = fs::symlink_metadata(&path)?;
        let is_link = link_metadata.file_type().is_symlink();

        let file_type = if is_link {
            match fs::metadata(&path) {
                Ok(target) => Self::classify(&target),
                Err(_) => FileType::Symlink,
            }
        } else {
            Self::classify(&link_metadata)
        };

        let mut entry = Self::new(path, file_type);
        entry.is_link = is_link;
        Ok(entry)
    }

    fn classify(metadata: &fs::Metadata) -> FileType {
        if metadata.is_dir() {
            FileType::Directory
        } else if metadata.is_file() {
            FileType::File
        } else {
            FileType::Other
        }
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    /// Get the file extension, lower-cased (if any).
    pub fn extension(&self) -> Option<String> {
        if self.is_dir() {
            return None;
        }
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(str::to_lowercase)
    }

    /// Synthetic file name carrying only this entry's extension.
    ///
    /// Used to resolve a type icon without depending on the real path.
    pub fn template_name(&self) -> String {
        template_name_for(self.extension().as_deref())
    }
}

/// Synthetic file name for an extension (`template.pdf`), or `template`
/// when there is none.
pub fn template_name_for(extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("template.{}", ext.to_lowercase()),
        _ => "template".to_string(),
    }
}
