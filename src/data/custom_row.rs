use bytemuck::Pod;

use super::row::{read_raw_at, write_raw_at};
use crate::codec::CodecContext;
use crate::color::Color32;
use crate::error::BitmapError;
use crate::palette::Palette;

/// One row of a custom-format bitmap, as seen by a getter callback.
///
/// Offsets passed to [`CustomRow::read_raw`] are in units of `T`, counted
/// from the start of the row.
pub struct CustomRow<'a> {
    bytes: &'a [u8],
    ctx: CodecContext<'a>,
}

impl<'a> CustomRow<'a> {
    pub(crate) fn new(bytes: &'a [u8], ctx: &CodecContext<'a>) -> Self {
        Self { bytes, ctx: *ctx }
    }

    pub fn read_raw<T: Pod>(&self, x: usize) -> Result<T, BitmapError> {
        read_raw_at(self.bytes, x)
    }

    /// The whole row, including any padding bits past the last pixel.
    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }

    /// Row index in the underlying buffer.
    pub fn index(&self) -> usize {
        self.ctx.y
    }

    pub fn width(&self) -> usize {
        self.ctx.width
    }

    pub fn back_color(&self) -> Color32 {
        self.ctx.back_color
    }

    pub fn alpha_threshold(&self) -> u8 {
        self.ctx.alpha_threshold
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.ctx.palette
    }
}

/// One row of a custom-format bitmap, as seen by a setter callback.
pub struct CustomRowMut<'a> {
    bytes: &'a mut [u8],
    ctx: CodecContext<'a>,
}

impl<'a> CustomRowMut<'a> {
    pub(crate) fn new(bytes: &'a mut [u8], ctx: &CodecContext<'a>) -> Self {
        Self { bytes, ctx: *ctx }
    }

    pub fn read_raw<T: Pod>(&self, x: usize) -> Result<T, BitmapError> {
        read_raw_at(&*self.bytes, x)
    }

    pub fn write_raw<T: Pod>(&mut self, x: usize, value: T) -> Result<(), BitmapError> {
        write_raw_at(&mut *self.bytes, x, value)
    }

    pub fn bytes(&self) -> &[u8] {
        &*self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    pub fn index(&self) -> usize {
        self.ctx.y
    }

    pub fn width(&self) -> usize {
        self.ctx.width
    }

    /// Color transparent pixels are flattened onto when the layout has no alpha.
    pub fn back_color(&self) -> Color32 {
        self.ctx.back_color
    }

    pub fn alpha_threshold(&self) -> u8 {
        self.ctx.alpha_threshold
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.ctx.palette
    }
}
