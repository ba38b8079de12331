//! Buffer pooling for repeated allocations of similar size.
//!
//! Pooling only reduces allocation churn; results never depend on it.

use std::sync::{Mutex, PoisonError};

/// Source of reusable byte buffers.
pub trait BufferPool: Send + Sync {
    /// A buffer with at least `len` bytes of capacity. Contents are unspecified.
    fn acquire(&self, len: usize) -> Vec<u8>;

    /// Hand a buffer back for reuse.
    fn release(&self, buffer: Vec<u8>);
}

/// A simple thread-safe pool keeping up to `max_buffers` released buffers.
#[derive(Debug)]
pub struct SharedBufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    max_buffers: usize,
}

impl SharedBufferPool {
    pub fn new(max_buffers: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
            max_buffers,
        }
    }

    /// Number of buffers waiting for reuse.
    pub fn available(&self) -> usize {
        self.buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for SharedBufferPool {
    fn default() -> Self {
        Self::new(8)
    }
}

impl BufferPool for SharedBufferPool {
    fn acquire(&self, len: usize) -> Vec<u8> {
        let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
        // Smallest buffer that fits.
        let best = buffers
            .iter()
            .enumerate()
            .filter(|(_, b)| b.capacity() >= len)
            .min_by_key(|(_, b)| b.capacity())
            .map(|(i, _)| i);
        match best {
            Some(i) => buffers.swap_remove(i),
            None => Vec::with_capacity(len),
        }
    }

    fn release(&self, buffer: Vec<u8>) {
        let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
        if buffers.len() < self.max_buffers {
            buffers.push(buffer);
        } else {
            log::trace!("buffer pool full, dropping {} bytes", buffer.capacity());
        }
    }
}
