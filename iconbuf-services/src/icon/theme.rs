// SPDX-License-Identifier: LGPL-3.0-only
//! XDG Icon Theme parsing.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::icon::error::IconError;

/// Penalty added when an icon would have to be upscaled.
const UPSCALE_PENALTY: u32 = 10_000;

/// Icon context (directory type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconContext {
    /// Actions context.
    Actions,
    /// Applications context.
    Apps,
    /// Devices context.
    Devices,
    /// Emblems context.
    Emblems,
    /// MIME types context.
    Mimetypes,
    /// Places context.
    Places,
    /// Status context.
    Status,
    /// Unknown context.
    Unknown,
}

impl IconContext {
    /// Parse context from an index.theme `Context` value.
    pub fn parse(s: &str) -> Self {
        match s {
            "Actions" => Self::Actions,
            "Applications" | "Apps" => Self::Apps,
            "Devices" => Self::Devices,
            "Emblems" => Self::Emblems,
            "MimeTypes" | "Mimetypes" => Self::Mimetypes,
            "Places" => Self::Places,
            "Status" => Self::Status,
            _ => Self::Unknown,
        }
    }

    /// Guess the context an icon name belongs to.
    pub fn for_icon_name(icon_name: &str) -> Self {
        if icon_name.starts_with("folder") || icon_name.starts_with("user-") {
            Self::Places
        } else if icon_name.starts_with("emblem-") {
            Self::Emblems
        } else if icon_name.starts_with("drive-") || icon_name.starts_with("media-") {
            Self::Devices
        } else if ["text-", "image-", "audio-", "video-", "application-", "font-", "package-", "inode-"]
            .iter()
            .any(|prefix| icon_name.starts_with(prefix))
        {
            Self::Mimetypes
        } else {
            Self::Unknown
        }
    }
}

/// Directory type for icon directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryType {
    /// Fixed size directory.
    Fixed,
    /// Scalable directory (SVG).
    Scalable,
    /// Threshold directory.
    Threshold,
}

impl DirectoryType {
    /// Parse directory type from an index.theme `Type` value.
    pub fn parse(s: &str) -> Self {
        match s {
            "Scalable" => Self::Scalable,
            "Threshold" => Self::Threshold,
            _ => Self::Fixed,
        }
    }
}

/// Icon directory information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDirectory {
    /// Directory name, relative to the theme root.
    pub name: String,
    /// Nominal size of icons in this directory.
    pub size: u32,
    /// Context of icons.
    pub context: IconContext,
    /// Directory type.
    pub directory_type: DirectoryType,
    /// Minimum size (for scalable).
    pub min_size: Option<u32>,
    /// Maximum size (for scalable).
    pub max_size: Option<u32>,
    /// Threshold (for threshold directories).
    pub threshold: Option<u32>,
}

impl IconDirectory {
    /// How badly this directory matches a requested pixel size; lower is better.
    ///
    /// Exact matches score 0. Larger icons (downscaled) are preferred over
    /// smaller ones (upscaled), which carry [`UPSCALE_PENALTY`].
    pub fn size_distance(&self, size: u32) -> u32 {
        let nominal = |dir_size: u32| {
            if dir_size >= size {
                dir_size - size
            } else {
                size - dir_size + UPSCALE_PENALTY
            }
        };

        match self.directory_type {
            DirectoryType::Fixed => nominal(self.size),
            DirectoryType::Scalable => {
                let min = self.min_size.unwrap_or(self.size);
                let max = self.max_size.unwrap_or(self.size);
                if (min..=max).contains(&size) {
                    0
                } else if size < min {
                    min - size
                } else {
                    size - max + UPSCALE_PENALTY
                }
            },
            DirectoryType::Threshold => {
                let threshold = self.threshold.unwrap_or(2);
                if self.size.abs_diff(size) <= threshold {
                    0
                } else {
                    nominal(self.size)
                }
            },
        }
    }
}

/// XDG Icon Theme.
#[derive(Debug, Clone)]
pub struct IconTheme {
    /// Theme name.
    pub name: String,
    /// Inherited themes (fallback chain).
    pub inherits: Vec<String>,
    /// Directories in this theme.
    pub directories: Vec<IconDirectory>,
    /// Base path to theme directory.
    pub base_path: PathBuf,
}

impl IconTheme {
    /// Load an icon theme from its directory.
    pub fn load(theme_name: &str, base_path: PathBuf) -> Result<Self, IconError> {
        if !base_path.is_dir() {
            return Err(IconError::InvalidThemeDirectory(base_path));
        }

        let index_path = base_path.join("index.theme");
        if !index_path.exists() {
            return Err(IconError::ThemeNotFound(theme_name.to_string()));
        }

        let content = std::fs::read_to_string(&index_path)?;
        Self::from_index(theme_name, base_path, &content)
    }

    /// Build a theme from the contents of its `index.theme`.
    pub fn from_index(theme_name: &str, base_path: PathBuf, content: &str) -> Result<Self, IconError> {
        let ini = parse_ini(content);

        let theme_section = ini
            .get("Icon Theme")
            .ok_or_else(|| IconError::IndexParseError("Missing [Icon Theme] section".to_string()))?;

        let name = theme_section
            .get("Name")
            .cloned()
            .unwrap_or_else(|| theme_name.to_string());

        let inherits = theme_section
            .get("Inherits")
            .map(|s| split_list(s))
            .unwrap_or_default();

        let directory_names = theme_section
            .get("Directories")
            .map(|s| split_list(s))
            .ok_or_else(|| IconError::IndexParseError("Missing Directories key".to_string()))?;

        let directories = directory_names
            .into_iter()
            .filter_map(|dir_name| {
                let section = ini.get(dir_name.as_str())?;
                let number = |key: &str| section.get(key).and_then(|s| s.parse::<u32>().ok());

                Some(IconDirectory {
                    size: number("Size").unwrap_or(48),
                    context: IconContext::parse(section.get("Context").map_or("Unknown", |s| s.as_str())),
                    directory_type: DirectoryType::parse(section.get("Type").map_or("Threshold", |s| s.as_str())),
                    min_size: number("MinSize"),
                    max_size: number("MaxSize"),
                    threshold: number("Threshold"),
                    name: dir_name,
                })
            })
            .collect();

        Ok(IconTheme {
            name,
            inherits,
            directories,
            base_path,
        })
    }

    /// Get the path to a directory by name.
    pub fn directory_path(&self, dir_name: &str) -> PathBuf {
        self.base_path.join(dir_name)
    }

    /// Directories ordered from best to worst match for a size and context.
    ///
    /// Directories of the requested context come first, then those with an
    /// unknown context, then everything else; ties are broken by size.
    pub fn ranked_directories(&self, size: u32, context: IconContext) -> Vec<&IconDirectory> {
        let context_rank = |dir: &IconDirectory| {
            if dir.context == context {
                0
            } else if dir.context == IconContext::Unknown {
                1
            } else {
                2
            }
        };

        let mut ranked: Vec<&IconDirectory> = self.directories.iter().collect();
        ranked.sort_by_key(|dir| (context_rank(dir), dir.size_distance(size)));
        ranked
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Minimal INI parser for index.theme files.
fn parse_ini(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut result: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current_section: Option<String> = None;

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current_section = Some(section.to_string());
            result.entry(section.to_string()).or_default();
            continue;
        }

        let (Some(section), Some((key, value))) = (current_section.as_ref(), line.split_once('=')) else {
            continue;
        };
        result
            .entry(section.clone())
            .or_default()
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
[Icon Theme]
Name=Test Theme
Inherits=hicolor, Adwaita
Directories=16x16/mimetypes,48x48/mimetypes,scalable/places

# comment
[16x16/mimetypes]
Size=16
Context=MimeTypes
Type=Fixed

[48x48/mimetypes]
Size=48
Context=MimeTypes
Type=Fixed

[scalable/places]
Size=64
MinSize=8
MaxSize=512
Context=Places
Type=Scalable
"#;

    fn theme() -> IconTheme {
        IconTheme::from_index("test", PathBuf::from("/themes/test"), INDEX).unwrap()
    }

    #[test]
    fn test_parse_index_theme() {
        let theme = theme();
        assert_eq!(theme.name, "Test Theme");
        assert_eq!(theme.inherits, vec!["hicolor", "Adwaita"]);
        assert_eq!(theme.directories.len(), 3);
        assert_eq!(theme.directories[0].context, IconContext::Mimetypes);
        assert_eq!(theme.directories[2].directory_type, DirectoryType::Scalable);
        assert_eq!(theme.directory_path("16x16/mimetypes"), PathBuf::from("/themes/test/16x16/mimetypes"));
    }

    #[test]
    fn test_missing_sections_are_errors() {
        let err = IconTheme::from_index("x", PathBuf::from("/x"), "[Other]\nKey=1").unwrap_err();
        assert!(matches!(err, IconError::IndexParseError(_)));

        let err = IconTheme::from_index("x", PathBuf::from("/x"), "[Icon Theme]\nName=x").unwrap_err();
        assert!(matches!(err, IconError::IndexParseError(_)));
    }

    #[test]
    fn test_ranking_prefers_context_then_downscale() {
        let theme = theme();

        let ranked = theme.ranked_directories(16, IconContext::Mimetypes);
        assert_eq!(ranked[0].name, "16x16/mimetypes");

        // 32px: downscaling from 48 beats upscaling from 16
        let ranked = theme.ranked_directories(32, IconContext::Mimetypes);
        assert_eq!(ranked[0].name, "48x48/mimetypes");

        let ranked = theme.ranked_directories(128, IconContext::Places);
        assert_eq!(ranked[0].name, "scalable/places");
    }

    #[test]
    fn test_threshold_distance() {
        let dir = IconDirectory {
            name: "22x22".to_string(),
            size: 22,
            context: IconContext::Unknown,
            directory_type: DirectoryType::Threshold,
            min_size: None,
            max_size: None,
            threshold: Some(4),
        };
        assert_eq!(dir.size_distance(24), 0);
        assert_eq!(dir.size_distance(16), 6);
        assert_eq!(dir.size_distance(32), 10 + UPSCALE_PENALTY);
    }
}
