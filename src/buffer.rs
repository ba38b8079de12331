//! Backing storage for bitmap data.
//!
//! Everything reduces to row-major bytes; [`BackingKind`] remembers what
//! the bytes came from so raw copies are only taken between compatible
//! backings.

use std::sync::Arc;
use core::fmt;

use bytemuck::Pod;

use crate::pool::BufferPool;

/// Where the bytes of a bitmap data instance live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackingKind {
    /// Foreign memory with an externally dictated stride.
    Native,
    /// A flat array of pixel elements.
    Array1D,
    /// A two-dimensional array with its own stride (`imgref::ImgVec`).
    Array2D,
    /// Pixels are reached through callbacks; never raw-copied.
    Delegated,
}

/// Row-major byte storage for [`crate::BitmapData`].
pub trait PixelBuffer: Send + Sync {
    fn backing_kind(&self) -> BackingKind;

    fn as_bytes(&self) -> &[u8];

    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Bytes per row when the storage dictates it.
    fn natural_stride(&self) -> Option<usize> {
        None
    }
}

impl<T: Pod + Send + Sync> PixelBuffer for Vec<T> {
    fn backing_kind(&self) -> BackingKind {
        BackingKind::Array1D
    }

    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(self.as_mut_slice())
    }
}

impl<T: Pod + Send + Sync> PixelBuffer for &mut [T] {
    fn backing_kind(&self) -> BackingKind {
        BackingKind::Array1D
    }

    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&**self)
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut **self)
    }
}

#[cfg(feature = "imgref")]
impl<T: Pod + Send + Sync> PixelBuffer for imgref::ImgVec<T> {
    fn backing_kind(&self) -> BackingKind {
        BackingKind::Array2D
    }

    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.buf().as_slice())
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(self.buf_mut().as_mut_slice())
    }

    fn natural_stride(&self) -> Option<usize> {
        Some(self.stride() * size_of::<T>())
    }
}

/// Memory owned elsewhere (a platform bitmap, a mapped frame buffer),
/// addressed with an explicit stride.
pub struct NativeBuffer<'a> {
    bytes: &'a mut [u8],
    stride: usize,
}

impl<'a> NativeBuffer<'a> {
    pub fn new(bytes: &'a mut [u8], stride: usize) -> Self {
        Self { bytes, stride }
    }
}

impl PixelBuffer for NativeBuffer<'_> {
    fn backing_kind(&self) -> BackingKind {
        BackingKind::Native
    }

    fn as_bytes(&self) -> &[u8] {
        &*self.bytes
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    fn natural_stride(&self) -> Option<usize> {
        Some(self.stride)
    }
}

impl fmt::Debug for NativeBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBuffer")
            .field("len", &self.bytes.len())
            .field("stride", &self.stride)
            .finish()
    }
}

/// Byte storage allocated by [`crate::BitmapDataBuilder::allocate`].
///
/// When it came from a pool, the bytes go back to the pool on drop.
pub struct OwnedBuffer {
    bytes: Vec<u8>,
    pool: Option<Arc<dyn BufferPool>>,
}

impl OwnedBuffer {
    pub(crate) fn allocate(len: usize, pool: Option<Arc<dyn BufferPool>>) -> Self {
        let bytes = match &pool {
            Some(pool) => {
                let mut bytes = pool.acquire(len);
                bytes.clear();
                bytes.resize(len, 0);
                bytes
            }
            None => vec![0; len],
        };
        Self { bytes, pool }
    }

    /// Take the bytes out, bypassing the pool.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.pool = None;
        core::mem::take(&mut self.bytes)
    }
}

impl Drop for OwnedBuffer {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.release(core::mem::take(&mut self.bytes));
        }
    }
}

impl PixelBuffer for OwnedBuffer {
    fn backing_kind(&self) -> BackingKind {
        BackingKind::Array1D
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl fmt::Debug for OwnedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedBuffer")
            .field("len", &self.bytes.len())
            .field("pooled", &self.pool.is_some())
            .finish()
    }
}
