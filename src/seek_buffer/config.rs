use crate::constants::{DEFAULT_DRAIN_CHUNK, DEFAULT_INITIAL_CAPACITY};

/// Describes how a [`SeekCache`](super::SeekCache) grows its buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Bytes reserved up front. Only a hint, the buffer grows as needed.
    pub initial_capacity: usize,
    /// Upper bound on a single source pull while catching up to an offset or
    /// draining to the end. Zero is treated as one.
    pub drain_chunk: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            drain_chunk: DEFAULT_DRAIN_CHUNK,
        }
    }
}

impl CacheConfig {
    /// Sets the capacity reserved when the cache is built.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the upper bound on a single pull during a drain.
    pub fn with_drain_chunk(mut self, drain_chunk: usize) -> Self {
        self.drain_chunk = drain_chunk;
        self
    }

    pub(crate) fn drain_chunk(&self) -> usize {
        self.drain_chunk.max(1)
    }
}
