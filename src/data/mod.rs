//! Bitmap data: pixel access over a backing buffer in any pixel format.
//!
//! [`BitmapData`] owns or wraps a [`PixelBuffer`](crate::PixelBuffer) and is
//! created with [`BitmapDataBuilder`]. Pixels are reached through row
//! cursors ([`Row`], [`RowMut`]) or the per-pixel convenience methods of
//! [`ReadableBitmapData`] and [`WritableBitmapData`]. The convenience
//! methods derive a fresh row on every call; loops should hold a cursor and
//! advance it with `move_next_row`.
//!
//! Every pixel format reads and writes the same color types. Formats that
//! cannot store a color exactly convert it on the way in: partially
//! transparent colors are blended onto the back color (or dropped below
//! the alpha threshold), indexed formats store the nearest palette entry.

mod bitmap;
mod builder;
mod clipped;
mod custom_row;
mod row;

use std::sync::Arc;

use bytemuck::Pod;

pub use bitmap::BitmapData;
pub use builder::BitmapDataBuilder;
pub use clipped::ClippedBitmapData;
pub use custom_row::{CustomRow, CustomRowMut};
pub use row::{Row, RowMut};

use crate::buffer::{BackingKind, OwnedBuffer};
use crate::color::{Color32, Color64, ColorF, PColor32, PColor64, PColorF, WorkingColorSpace};
use crate::copy::CloneRequest;
use crate::error::BitmapError;
use crate::format::{KnownPixelFormat, PixelFormatInfo};
use crate::geometry::Rect;
use crate::palette::Palette;

/// Where the pixels of a bitmap data instance sit in memory, for callers
/// that may move bytes directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawLayout {
    pub kind: BackingKind,
    /// Pixel offset of column 0 within each physical row.
    pub x_offset: usize,
    /// Pixels per physical row.
    pub physical_width: usize,
}

/// Properties shared by readable and writable bitmap data.
pub trait BitmapDataInfo: Send + Sync {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn bounds(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    fn pixel_format(&self) -> PixelFormatInfo;

    /// The built-in format, or `None` for custom layouts.
    fn known_format(&self) -> Option<KnownPixelFormat>;

    /// Present exactly when the pixel format is indexed.
    fn palette(&self) -> Option<&Arc<Palette>>;

    /// Color partially transparent pixels are blended onto when the format
    /// cannot store them. Always opaque.
    fn back_color(&self) -> Color32;

    /// Alpha below which a color is treated as fully transparent by
    /// formats without multi-level alpha.
    fn alpha_threshold(&self) -> u8;

    /// Blending space, already resolved against the format's gamma.
    fn working_color_space(&self) -> WorkingColorSpace;

    /// Bytes per row of the backing buffer.
    fn row_size(&self) -> usize;

    fn backing_kind(&self) -> BackingKind;

    fn is_disposed(&self) -> bool;

    /// `None` when the pixels cannot be moved as raw bytes (custom
    /// formats, disposed data).
    fn raw_layout(&self) -> Option<RawLayout>;
}

/// Read access to bitmap data.
pub trait ReadableBitmapData: BitmapDataInfo {
    /// Cursor positioned at row `y`.
    fn row(&self, y: usize) -> Result<Row<'_>, BitmapError>;

    fn first_row(&self) -> Result<Row<'_>, BitmapError> {
        self.row(0)
    }

    fn get_color32(&self, x: usize, y: usize) -> Result<Color32, BitmapError> {
        self.row(y)?.get_color32(x)
    }

    fn get_pcolor32(&self, x: usize, y: usize) -> Result<PColor32, BitmapError> {
        self.row(y)?.get_pcolor32(x)
    }

    fn get_color64(&self, x: usize, y: usize) -> Result<Color64, BitmapError> {
        self.row(y)?.get_color64(x)
    }

    fn get_pcolor64(&self, x: usize, y: usize) -> Result<PColor64, BitmapError> {
        self.row(y)?.get_pcolor64(x)
    }

    fn get_color_f(&self, x: usize, y: usize) -> Result<ColorF, BitmapError> {
        self.row(y)?.get_color_f(x)
    }

    fn get_pcolor_f(&self, x: usize, y: usize) -> Result<PColorF, BitmapError> {
        self.row(y)?.get_pcolor_f(x)
    }

    fn get_color_index(&self, x: usize, y: usize) -> Result<u32, BitmapError> {
        self.row(y)?.get_color_index(x)
    }

    fn read_raw<T: Pod>(&self, x: usize, y: usize) -> Result<T, BitmapError>
    where
        Self: Sized,
    {
        self.row(y)?.read_raw(x)
    }

    /// Start a [`CloneRequest`] copying `rect` into new bitmap data.
    fn clone_region(&self, rect: Rect) -> CloneRequest<'_>
    where
        Self: Sized,
    {
        CloneRequest::new(self).with_rect(rect)
    }
}

/// Write access to bitmap data.
pub trait WritableBitmapData: BitmapDataInfo {
    /// Cursor positioned at row `y`, able to advance to the last row.
    fn row_mut(&mut self, y: usize) -> Result<RowMut<'_>, BitmapError>;

    /// One single-row cursor per row, top to bottom. The cursors borrow
    /// disjoint memory and can be handed to different threads.
    fn rows_mut(&mut self) -> Result<Vec<RowMut<'_>>, BitmapError>;

    fn set_color32(&mut self, x: usize, y: usize, color: Color32) -> Result<(), BitmapError> {
        self.row_mut(y)?.set_color32(x, color)
    }

    fn set_pcolor32(&mut self, x: usize, y: usize, color: PColor32) -> Result<(), BitmapError> {
        self.row_mut(y)?.set_pcolor32(x, color)
    }

    fn set_color64(&mut self, x: usize, y: usize, color: Color64) -> Result<(), BitmapError> {
        self.row_mut(y)?.set_color64(x, color)
    }

    fn set_pcolor64(&mut self, x: usize, y: usize, color: PColor64) -> Result<(), BitmapError> {
        self.row_mut(y)?.set_pcolor64(x, color)
    }

    fn set_color_f(&mut self, x: usize, y: usize, color: ColorF) -> Result<(), BitmapError> {
        self.row_mut(y)?.set_color_f(x, color)
    }

    fn set_pcolor_f(&mut self, x: usize, y: usize, color: PColorF) -> Result<(), BitmapError> {
        self.row_mut(y)?.set_pcolor_f(x, color)
    }

    fn set_color_index(&mut self, x: usize, y: usize, index: u32) -> Result<(), BitmapError> {
        self.row_mut(y)?.set_color_index(x, index)
    }

    fn write_raw<T: Pod>(&mut self, x: usize, y: usize, value: T) -> Result<(), BitmapError>
    where
        Self: Sized,
    {
        self.row_mut(y)?.write_raw(x, value)
    }

    /// Set every pixel to `color`.
    fn clear(&mut self, color: Color32) -> Result<(), BitmapError> {
        let mut row = self.row_mut(0)?;
        loop {
            for x in 0..row.width() {
                row.set_color32(x, color)?;
            }
            if !row.move_next_row() {
                return Ok(());
            }
        }
    }
}

/// Bitmap data that can be read, written, and can produce empty siblings
/// with the same layout.
pub trait ReadWriteBitmapData: ReadableBitmapData + WritableBitmapData {
    /// New zeroed bitmap data of the given size, with the same pixel
    /// format (custom callbacks included), palette, back color, alpha
    /// threshold and working color space.
    fn create_compatible(
        &self,
        width: usize,
        height: usize,
    ) -> Result<BitmapData<OwnedBuffer>, BitmapError>;
}
