// SPDX-License-Identifier: LGPL-3.0-only
//! The background extraction thread.
//!
//! One worker per buffer drains the [`WorkQueue`], runs the fallback chain
//! for every item not cached yet and hands the raw result to the cache
//! through a [`CacheWriter`]. It never sees a renderable icon.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use iconbuf_services::StockIcons;

use crate::cache::CacheWriter;
use crate::error::BufferError;
use crate::fallback;
use crate::queue::WorkQueue;
use crate::size::SizeClass;

/// Name of the worker thread.
pub const WORKER_THREAD_NAME: &str = "icon-buffer-worker";

/// Handle to a running worker thread. Dropping it stops and joins the thread.
pub struct Worker {
    queue: Arc<WorkQueue>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start a worker producing icons of `size`.
    pub fn spawn(
        size: SizeClass,
        queue: Arc<WorkQueue>,
        writer: CacheWriter,
        stock: Arc<dyn StockIcons>,
    ) -> Result<Self, BufferError> {
        let thread_queue = queue.clone();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run(size, &thread_queue, &writer, stock.as_ref()))?;

        Ok(Self {
            queue,
            handle: Some(handle),
        })
    }

    /// Whether the thread has exited, after shutdown or a failed initialization.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Request shutdown and wait for the thread to exit.
    ///
    /// Returns within one poll interval plus the time to finish the icon
    /// currently being extracted.
    pub fn shutdown(&mut self) {
        self.queue.shutdown();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("IconWorker: Worker thread panicked");
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(size: SizeClass, queue: &WorkQueue, writer: &CacheWriter, stock: &dyn StockIcons) {
    log::info!("IconWorker: Starting for {:?} icons ({}px)", size, size.pixel_size());

    if let Err(e) = stock.initialize() {
        log::error!("IconWorker: Failed to initialize icon sources, stopping: {}", e);
        return;
    }

    let mut extracted = 0usize;
    while let Some(item) = queue.pop_blocking() {
        // Repeated urgent requests leave stale duplicates behind
        if writer.contains(&item.key) {
            log::trace!("IconWorker: {} already cached", item.key);
            continue;
        }

        let icon = fallback::select_icon(item.loader.as_ref(), &item.fallback_name, size, stock);
        log::debug!("IconWorker: Extracted {} ({}x{})", item.key, icon.width(), icon.height());
        // The interactive thread may have cached the same key meanwhile
        if writer.insert_if_absent(item.key.clone(), icon) {
            extracted += 1;
        } else {
            log::debug!("IconWorker: {} was cached while extracting, dropping result", item.key);
        }
    }

    log::info!("IconWorker: Stopped after extracting {} icons", extracted);
}
