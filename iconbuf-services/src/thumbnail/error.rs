// SPDX-License-Identifier: LGPL-3.0-only
//! Error types for thumbnail operations.

use thiserror::Error;

/// Errors that can occur while producing a thumbnail.
#[derive(Error, Debug)]
pub enum ThumbnailError {
    /// The file type is not supported for thumbnail generation.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The source file is too large to decode for a thumbnail.
    #[error("Source file too large: {0} bytes")]
    TooLarge(u64),

    /// Decoding the source image failed.
    #[error("Thumbnail generation failed: {0}")]
    GenerationFailed(String),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
