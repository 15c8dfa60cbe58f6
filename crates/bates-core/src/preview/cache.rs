//! Rendered base frames keyed by `(file index, page)`.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::frame::RasterFrame;

pub type FrameKey = (usize, usize);

/// LRU cache of un-stamped page frames for the current intake.
pub struct FrameCache {
    cache: LruCache<FrameKey, RasterFrame>,
}

impl FrameCache {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    pub fn get(&mut self, file_index: usize, page: usize) -> Option<RasterFrame> {
        let result = self.cache.get(&(file_index, page)).cloned();
        if result.is_some() {
            debug!(file_index, page, "Frame cache hit");
        }
        result
    }

    pub fn put(&mut self, file_index: usize, page: usize, frame: RasterFrame) {
        self.cache.put((file_index, page), frame);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn frame_count(&self) -> usize {
        self.cache.len()
    }
}
