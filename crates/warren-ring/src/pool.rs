//! Recycling pool for circular buffers.

use std::fmt;

use warren_core::{AllocatorKind, MemoryFootprint};

use crate::buffer::CircularBuffer;
use crate::config::RingPoolConfig;
use crate::error::RingError;

/// A pool of idle [`CircularBuffer`]s.
///
/// Path post-processing takes a buffer, fills it, and gives it back when the
/// call returns, so steady-state processing reuses the same backing arrays
/// instead of allocating per call.
///
/// Not thread-safe; keep one pool per worker.
pub struct RingPool<T> {
    idle: Vec<CircularBuffer<T>>,
    config: RingPoolConfig,
    created: usize,
}

impl<T: Copy + Default> RingPool<T> {
    /// Create an empty pool from a validated config.
    pub fn new(config: RingPoolConfig) -> Result<Self, RingError> {
        config.validate()?;
        Ok(Self {
            idle: Vec::with_capacity(config.max_pooled),
            config,
            created: 0,
        })
    }

    /// Hand out an empty buffer, reusing an idle one if available.
    pub fn take(&mut self) -> CircularBuffer<T> {
        match self.idle.pop() {
            Some(buf) => buf,
            None => {
                self.created += 1;
                CircularBuffer::with_capacity_in(self.config.initial_capacity, self.config.allocator)
            }
        }
    }

    /// Return a buffer to the pool. It is cleared; buffers beyond the
    /// retention limits are dropped.
    pub fn give(&mut self, mut buf: CircularBuffer<T>) {
        if buf.capacity() > self.config.max_retained_capacity
            || self.idle.len() >= self.config.max_pooled
        {
            tracing::trace!(
                capacity = buf.capacity(),
                idle = self.idle.len(),
                "ring pool dropped returned buffer"
            );
            return;
        }
        buf.clear();
        self.idle.push(buf);
    }

    /// Number of idle buffers held.
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Number of buffers this pool has allocated over its lifetime.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// The config this pool was built with.
    pub fn config(&self) -> &RingPoolConfig {
        &self.config
    }
}

impl<T: Copy + Default> Default for RingPool<T> {
    fn default() -> Self {
        let config = RingPoolConfig::default();
        Self {
            idle: Vec::with_capacity(config.max_pooled),
            config,
            created: 0,
        }
    }
}

impl<T> MemoryFootprint for RingPool<T> {
    fn memory_bytes(&self) -> usize {
        self.idle.iter().map(MemoryFootprint::memory_bytes).sum()
    }

    fn allocator_kind(&self) -> AllocatorKind {
        self.config.allocator
    }
}

impl<T> fmt::Debug for RingPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingPool")
            .field("idle", &self.idle.len())
            .field("created", &self.created)
            .field("config", &self.config)
            .finish()
    }
}
