// SPDX-License-Identifier: LGPL-3.0-only
use std::time::Duration;

use iconbuf_services::settings::Config;

/// Default upper bound on live cache entries.
///
/// Large enough for a visible window of a file list plus a pre-fetch margin,
/// small enough to stay clear of per-process graphics resource quotas.
pub const BUFFER_SIZE_MAX: usize = 800;

/// Smallest accepted capacity, so that a workload of one item still fits.
pub const MIN_ENTRIES: usize = 2;

/// Default interval after which an idle worker re-checks for work and shutdown.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Icon buffer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Maximum number of cached icons kept after each trim. At least [`MIN_ENTRIES`].
    pub max_entries: usize,
    /// Bounded wait of the worker, also the worst-case shutdown latency.
    pub poll_interval: Duration,
}

impl BufferConfig {
    /// Set the maximum number of cached icons, raised to [`MIN_ENTRIES`].
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(MIN_ENTRIES);
        self
    }

    /// Set the worker poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// Build from the `[buffer]` section of the settings; unset keys keep
    /// their defaults.
    pub fn from_settings(config: &Config) -> Self {
        let mut buffer = Self::default();
        if let Some(max_entries) = config.buffer.max_entries {
            buffer = buffer.with_max_entries(max_entries);
        }
        if let Some(ms) = config.buffer.poll_interval_ms {
            buffer = buffer.with_poll_interval(Duration::from_millis(ms));
        }
        buffer
    }

    /// Largest workload accepted by
    /// [`IconBuffer::set_workload`](crate::IconBuffer::set_workload).
    pub fn max_workload(&self) -> usize {
        self.max_entries / 2
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_entries: BUFFER_SIZE_MAX,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
