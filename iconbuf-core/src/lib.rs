// SPDX-License-Identifier: LGPL-3.0-only
#![warn(missing_docs)]

//! Core library for iconbuf => See `iconbuf` crate.
//!
//! Contains the work queue, the recency-ordered icon cache, the background
//! worker and the [`IconBuffer`](buffer::IconBuffer) facade tying them
//! together.

/// The public entry point used by the interactive thread.
pub mod buffer;
/// The bounded icon cache and its thread-safe writer half.
pub mod cache;
/// Buffer configuration.
pub mod config;
/// Error types.
pub mod error;
/// Ordered fallback used to pick an icon for a work item.
pub mod fallback;
/// Cache keys.
pub mod key;
/// The LIFO queue of pending icon requests.
pub mod queue;
/// Icons ready to be drawn.
pub mod renderable;
/// Icon size classes.
pub mod size;
/// The background extraction thread.
pub mod worker;

pub use buffer::{IconBuffer, ReadyProbe};
pub use cache::{CacheWriter, IconCache};
pub use config::{BufferConfig, BUFFER_SIZE_MAX, MIN_ENTRIES};
pub use error::BufferError;
pub use key::IconKey;
pub use queue::{WorkItem, WorkQueue};
pub use renderable::RenderableIcon;
pub use size::SizeClass;
