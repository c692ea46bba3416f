// SPDX-License-Identifier: LGPL-3.0-only
//! Mapping from MIME types to freedesktop icon names.

/// Candidate theme icon names for a MIME type, most specific first.
///
/// `image/png` yields `image-png` followed by the generic `image-x-generic`.
/// Directories map to `folder`. The list never contains duplicates.
pub fn icon_names_for_mime(mime_type: &str) -> Vec<String> {
    let Some((main_type, sub_type)) = mime_type.split_once('/') else {
        return Vec::new();
    };

    let mut names = Vec::new();
    let mut push = |name: String| {
        if !names.contains(&name) {
            names.push(name);
        }
    };

    if main_type == "inode" {
        match sub_type {
            "directory" => push("folder".to_string()),
            "symlink" => push("inode-symlink".to_string()),
            _ => {},
        }
        return names;
    }

    // Specific freedesktop icon name: '/' becomes '-'
    push(format!("{}-{}", main_type, sub_type.replace('/', "-")));

    match (main_type, sub_type) {
        ("application", "x-executable" | "x-sharedlib" | "vnd.appimage") => {
            push("application-x-executable".to_string());
        },
        ("application", "x-sh" | "x-shellscript") => {
            push("text-x-script".to_string());
        },
        ("application", "zip" | "x-tar" | "gzip" | "x-gzip" | "x-bzip2" | "x-7z-compressed" | "x-rar-compressed") => {
            push("package-x-generic".to_string());
        },
        _ => {},
    }

    let generic = match main_type {
        "text" => "text-x-generic",
        "image" => "image-x-generic",
        "video" => "video-x-generic",
        "audio" => "audio-x-generic",
        "font" => "font-x-generic",
        _ => "application-x-generic",
    };
    push(generic.to_string());

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_then_generic() {
        assert_eq!(icon_names_for_mime("image/png"), vec!["image-png", "image-x-generic"]);
        assert_eq!(icon_names_for_mime("application/pdf"), vec!["application-pdf", "application-x-generic"]);
        assert_eq!(icon_names_for_mime("text/x-rust"), vec!["text-x-rust", "text-x-generic"]);
    }

    #[test]
    fn test_archives_and_executables() {
        assert_eq!(
            icon_names_for_mime("application/zip"),
            vec!["application-zip", "package-x-generic", "application-x-generic"]
        );
        assert_eq!(
            icon_names_for_mime("application/x-executable"),
            vec!["application-x-executable", "application-x-generic"]
        );
    }

    #[test]
    fn test_inode_types() {
        assert_eq!(icon_names_for_mime("inode/directory"), vec!["folder"]);
        assert!(icon_names_for_mime("inode/socket").is_empty());
        assert!(icon_names_for_mime("garbage").is_empty());
    }
}
