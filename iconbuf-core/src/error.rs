// SPDX-License-Identifier: LGPL-3.0-only
use thiserror::Error;

/// Errors surfaced by the icon buffer.
///
/// Icon extraction itself never fails from the caller's point of view; only
/// setting up the buffer can.
#[derive(Error, Debug)]
pub enum BufferError {
    /// The worker thread could not be started.
    #[error("Failed to spawn icon worker: {0}")]
    Spawn(#[from] std::io::Error),
}
