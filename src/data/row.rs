use bytemuck::Pod;

use crate::codec::{CodecContext, PixelCodec, not_indexed};
use crate::color::{Color32, Color64, ColorF, PColor32, PColor64, PColorF};
use crate::error::BitmapError;
use crate::format::PixelFormatInfo;
use crate::geometry::Rect;

/// Geometry shared by every row of one bitmap data instance.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub width: usize,
    pub height: usize,
    /// Bytes between the starts of consecutive rows.
    pub stride: usize,
    /// Bytes holding the pixels of one row.
    pub row_len: usize,
    pub info: PixelFormatInfo,
}

/// `T` at `x * size_of::<T>()` within `bytes`.
pub(crate) fn read_raw_at<T: Pod>(bytes: &[u8], x: usize) -> Result<T, BitmapError> {
    let range = raw_range::<T>(bytes.len(), x)?;
    Ok(bytemuck::pod_read_unaligned(&bytes[range]))
}

pub(crate) fn write_raw_at<T: Pod>(bytes: &mut [u8], x: usize, value: T) -> Result<(), BitmapError> {
    let range = raw_range::<T>(bytes.len(), x)?;
    bytes[range].copy_from_slice(bytemuck::bytes_of(&value));
    Ok(())
}

fn raw_range<T>(len: usize, x: usize) -> Result<core::ops::Range<usize>, BitmapError> {
    let size = size_of::<T>();
    let limit = len.checked_div(size).unwrap_or(0);
    let start = x
        .checked_mul(size)
        .filter(|start| start.checked_add(size).is_some_and(|end| end <= len))
        .ok_or_else(|| BitmapError::out_of_range("raw offset", x, limit))?;
    Ok(start..start + size)
}

macro_rules! row_getters {
    () => {
        #[inline]
        pub fn get_color32(&self, x: usize) -> Result<Color32, BitmapError> {
            let x = self.codec_x(x)?;
            self.codec.get_color32(self.bytes(), x, &self.ctx)
        }

        #[inline]
        pub fn get_pcolor32(&self, x: usize) -> Result<PColor32, BitmapError> {
            let x = self.codec_x(x)?;
            self.codec.get_pcolor32(self.bytes(), x, &self.ctx)
        }

        #[inline]
        pub fn get_color64(&self, x: usize) -> Result<Color64, BitmapError> {
            let x = self.codec_x(x)?;
            self.codec.get_color64(self.bytes(), x, &self.ctx)
        }

        #[inline]
        pub fn get_pcolor64(&self, x: usize) -> Result<PColor64, BitmapError> {
            let x = self.codec_x(x)?;
            self.codec.get_pcolor64(self.bytes(), x, &self.ctx)
        }

        #[inline]
        pub fn get_color_f(&self, x: usize) -> Result<ColorF, BitmapError> {
            let x = self.codec_x(x)?;
            self.codec.get_color_f(self.bytes(), x, &self.ctx)
        }

        #[inline]
        pub fn get_pcolor_f(&self, x: usize) -> Result<PColorF, BitmapError> {
            let x = self.codec_x(x)?;
            self.codec.get_pcolor_f(self.bytes(), x, &self.ctx)
        }

        /// Palette index at `x`. Fails with `InvalidState` for non-indexed formats.
        pub fn get_color_index(&self, x: usize) -> Result<u32, BitmapError> {
            if !self.layout.info.is_indexed() {
                return Err(not_indexed());
            }
            let x = self.codec_x(x)?;
            self.codec.get_color_index(self.bytes(), x, &self.ctx)
        }

        /// Width of the row in pixels.
        #[inline]
        pub fn width(&self) -> usize {
            self.width
        }

        #[inline]
        pub fn pixel_format(&self) -> PixelFormatInfo {
            self.layout.info
        }
    };
}

/// Read cursor over the rows of a bitmap data instance.
///
/// Positioned at one row; [`Row::move_next_row`] walks forward. For random
/// access, ask the bitmap data for the row at a given `y`.
pub struct Row<'a> {
    buffer: &'a [u8],
    /// Physical row index of `buffer[0]`.
    first: usize,
    layout: Layout,
    y: usize,
    /// Logical row count (exclusive upper bound for `y`).
    height: usize,
    y_offset: usize,
    x_offset: usize,
    width: usize,
    codec: &'a dyn PixelCodec,
    ctx: CodecContext<'a>,
}

impl<'a> Row<'a> {
    pub(crate) fn new(
        buffer: &'a [u8],
        layout: Layout,
        codec: &'a dyn PixelCodec,
        ctx: CodecContext<'a>,
        y: usize,
    ) -> Self {
        Self {
            buffer,
            first: 0,
            layout,
            y,
            height: layout.height,
            y_offset: 0,
            x_offset: 0,
            width: layout.width,
            codec,
            ctx: CodecContext { y, ..ctx },
        }
    }

    /// Rebase onto a sub-rectangle given in this row's coordinates.
    pub(crate) fn clip(self, rect: Rect) -> Self {
        Self {
            y: self.y - rect.y,
            height: rect.height,
            y_offset: self.y_offset + rect.y,
            x_offset: self.x_offset + rect.x,
            width: rect.width,
            ..self
        }
    }

    /// Index of the current row.
    #[inline]
    pub fn index(&self) -> usize {
        self.y
    }

    /// Advance to the next row. Returns `false` (and stays put) at the last row.
    pub fn move_next_row(&mut self) -> bool {
        if self.y + 1 >= self.height {
            return false;
        }
        self.y += 1;
        self.ctx.y = self.y + self.y_offset;
        true
    }

    /// Reinterpret the row's bytes as `T`s and read the one at `x`.
    ///
    /// Fails with `IndexOutOfRange` when the value would extend past the
    /// row, and with `InvalidState` when the row starts mid-byte.
    pub fn read_raw<T: Pod>(&self, x: usize) -> Result<T, BitmapError> {
        read_raw_at(self.raw_bytes()?, x)
    }

    row_getters!();

    /// Physical bytes of the current row.
    #[inline]
    pub(crate) fn bytes(&self) -> &'a [u8] {
        let start = (self.y + self.y_offset - self.first) * self.layout.stride;
        &self.buffer[start..start + self.layout.row_len]
    }

    /// Horizontal offset of pixel 0 inside [`Row::bytes`].
    #[inline]
    pub(crate) fn x_offset(&self) -> usize {
        self.x_offset
    }

    fn raw_bytes(&self) -> Result<&'a [u8], BitmapError> {
        let bits = self.x_offset * self.layout.info.bits_per_pixel() as usize;
        if bits % 8 != 0 {
            return Err(BitmapError::InvalidState(
                "raw access on a row that does not start on a byte boundary".into(),
            ));
        }
        let end = self.layout.info.byte_width(self.x_offset + self.width);
        Ok(&self.bytes()[bits / 8..end])
    }

    #[inline]
    fn codec_x(&self, x: usize) -> Result<usize, BitmapError> {
        if x >= self.width {
            return Err(BitmapError::out_of_range("x", x, self.width));
        }
        Ok(x + self.x_offset)
    }
}

/// Read-write cursor over the rows of a bitmap data instance.
///
/// Rows handed out for parallel processing cover exactly one row each.
pub struct RowMut<'a> {
    buffer: &'a mut [u8],
    first: usize,
    end: usize,
    layout: Layout,
    y: usize,
    width: usize,
    codec: &'a dyn PixelCodec,
    ctx: CodecContext<'a>,
}

macro_rules! row_setter {
    ($name:ident, $codec_fn:ident, $ty:ty) => {
        #[inline]
        pub fn $name(&mut self, x: usize, color: $ty) -> Result<(), BitmapError> {
            let x = self.codec_x(x)?;
            let ctx = self.ctx;
            let codec = self.codec;
            codec.$codec_fn(self.bytes_mut(), x, color, &ctx)
        }
    };
}

impl<'a> RowMut<'a> {
    /// `buffer` holds the physical rows `first..end`.
    pub(crate) fn new(
        buffer: &'a mut [u8],
        first: usize,
        end: usize,
        layout: Layout,
        codec: &'a dyn PixelCodec,
        ctx: CodecContext<'a>,
    ) -> Self {
        Self {
            buffer,
            first,
            end,
            layout,
            y: first,
            width: layout.width,
            codec,
            ctx: CodecContext { y: first, ..ctx },
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.y
    }

    /// Advance to the next row. Returns `false` (and stays put) at the last row.
    pub fn move_next_row(&mut self) -> bool {
        if self.y + 1 >= self.end {
            return false;
        }
        self.y += 1;
        self.ctx.y = self.y;
        true
    }

    row_getters!();

    row_setter!(set_color32, set_color32, Color32);
    row_setter!(set_pcolor32, set_pcolor32, PColor32);
    row_setter!(set_color64, set_color64, Color64);
    row_setter!(set_pcolor64, set_pcolor64, PColor64);
    row_setter!(set_color_f, set_color_f, ColorF);
    row_setter!(set_pcolor_f, set_pcolor_f, PColorF);

    /// Store a palette index.
    ///
    /// Valid indexes are below both the palette size and the format's
    /// addressable range; anything else is `IndexOutOfRange`.
    pub fn set_color_index(&mut self, x: usize, index: u32) -> Result<(), BitmapError> {
        let info = self.layout.info;
        let palette_len = match (info.is_indexed(), self.ctx.palette) {
            (true, Some(palette)) => palette.len(),
            _ => return Err(not_indexed()),
        };
        let limit = palette_len.min(info.max_palette_size().unwrap_or(0));
        if index as usize >= limit {
            return Err(BitmapError::out_of_range("color index", index as usize, limit));
        }
        let x = self.codec_x(x)?;
        let ctx = self.ctx;
        let codec = self.codec;
        codec.set_color_index(self.bytes_mut(), x, index, &ctx)
    }

    pub fn read_raw<T: Pod>(&self, x: usize) -> Result<T, BitmapError> {
        read_raw_at(self.bytes(), x)
    }

    /// Reinterpret the row's bytes as `T`s and overwrite the one at `x`.
    pub fn write_raw<T: Pod>(&mut self, x: usize, value: T) -> Result<(), BitmapError> {
        write_raw_at(self.bytes_mut(), x, value)
    }

    /// Read-only view of the current row.
    pub fn as_row(&self) -> Row<'_> {
        Row {
            buffer: self.bytes(),
            first: self.y,
            layout: self.layout,
            y: self.y,
            height: self.y + 1,
            y_offset: 0,
            x_offset: 0,
            width: self.width,
            codec: self.codec,
            ctx: self.ctx,
        }
    }

    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        let start = (self.y - self.first) * self.layout.stride;
        &self.buffer[start..start + self.layout.row_len]
    }

    #[inline]
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        let start = (self.y - self.first) * self.layout.stride;
        &mut self.buffer[start..start + self.layout.row_len]
    }

    #[inline]
    fn codec_x(&self, x: usize) -> Result<usize, BitmapError> {
        if x >= self.width {
            return Err(BitmapError::out_of_range("x", x, self.width));
        }
        Ok(x)
    }
}
