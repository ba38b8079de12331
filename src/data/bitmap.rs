use std::sync::Arc;
use core::fmt;

use super::builder::BitmapDataBuilder;
use super::row::{Layout, Row, RowMut};
use super::{BitmapDataInfo, RawLayout, ReadWriteBitmapData, ReadableBitmapData, WritableBitmapData};
use crate::buffer::{BackingKind, OwnedBuffer, PixelBuffer};
use crate::codec::{CodecContext, PixelCodec};
use crate::color::{Color32, WorkingColorSpace};
use crate::error::BitmapError;
use crate::format::{CustomPixelFormat, KnownPixelFormat, PixelFormatInfo};
use crate::palette::Palette;
use crate::pool::BufferPool;

/// What a bitmap data instance was built from.
#[derive(Clone, Debug)]
pub(crate) enum FormatSpec {
    Known(KnownPixelFormat),
    Custom(CustomPixelFormat),
}

impl FormatSpec {
    pub(crate) fn info(&self) -> PixelFormatInfo {
        match self {
            FormatSpec::Known(format) => format.info(),
            FormatSpec::Custom(format) => format.info(),
        }
    }
}

/// Pixels of one pixel format stored row-major in a [`PixelBuffer`].
///
/// Create it with [`BitmapDataBuilder`]. [`BitmapData::dispose`] releases
/// the buffer early (back to its pool, for allocated data); any later
/// pixel access fails with [`BitmapError::InvalidState`].
pub struct BitmapData<B: PixelBuffer> {
    pub(super) buffer: Option<B>,
    pub(super) layout: Layout,
    pub(super) format: FormatSpec,
    pub(super) codec: Arc<dyn PixelCodec>,
    pub(super) palette: Option<Arc<Palette>>,
    pub(super) back_color: Color32,
    pub(super) alpha_threshold: u8,
    /// As configured; resolved on use.
    pub(super) color_space: WorkingColorSpace,
    pub(super) pool: Option<Arc<dyn BufferPool>>,
}

impl<B: PixelBuffer> BitmapData<B> {
    /// Release the backing buffer. Idempotent.
    pub fn dispose(&mut self) {
        if self.buffer.take().is_some() {
            log::trace!(
                "disposed {}x{} bitmap data",
                self.layout.width,
                self.layout.height
            );
        }
    }

    /// The backing buffer, or `None` once disposed.
    pub fn buffer(&self) -> Option<&B> {
        self.buffer.as_ref()
    }

    pub fn into_buffer(mut self) -> Option<B> {
        self.buffer.take()
    }

    /// Raw bytes of the backing buffer.
    pub fn bytes(&self) -> Result<&[u8], BitmapError> {
        Ok(self.buffer.as_ref().ok_or_else(BitmapError::disposed)?.as_bytes())
    }

    pub(crate) fn format_spec(&self) -> &FormatSpec {
        &self.format
    }

    fn context(&self) -> CodecContext<'_> {
        CodecContext {
            palette: self.palette.as_deref(),
            back_color: self.back_color,
            alpha_threshold: self.alpha_threshold,
            color_space: self.working_color_space(),
            width: self.layout.width,
            y: 0,
        }
    }

    fn check_y(&self, y: usize) -> Result<(), BitmapError> {
        if y >= self.layout.height {
            return Err(BitmapError::out_of_range("y", y, self.layout.height));
        }
        Ok(())
    }
}

impl<B: PixelBuffer> BitmapDataInfo for BitmapData<B> {
    fn width(&self) -> usize {
        self.layout.width
    }

    fn height(&self) -> usize {
        self.layout.height
    }

    fn pixel_format(&self) -> PixelFormatInfo {
        self.layout.info
    }

    fn known_format(&self) -> Option<KnownPixelFormat> {
        match &self.format {
            FormatSpec::Known(format) => Some(*format),
            FormatSpec::Custom(_) => None,
        }
    }

    fn palette(&self) -> Option<&Arc<Palette>> {
        self.palette.as_ref()
    }

    fn back_color(&self) -> Color32 {
        self.back_color
    }

    fn alpha_threshold(&self) -> u8 {
        self.alpha_threshold
    }

    fn working_color_space(&self) -> WorkingColorSpace {
        self.color_space.resolve(self.layout.info.linear_gamma())
    }

    fn row_size(&self) -> usize {
        self.layout.stride
    }

    fn backing_kind(&self) -> BackingKind {
        match (&self.format, &self.buffer) {
            (FormatSpec::Custom(_), _) => BackingKind::Delegated,
            (_, Some(buffer)) => buffer.backing_kind(),
            (_, None) => BackingKind::Array1D,
        }
    }

    fn is_disposed(&self) -> bool {
        self.buffer.is_none()
    }

    fn raw_layout(&self) -> Option<RawLayout> {
        match (&self.format, &self.buffer) {
            (FormatSpec::Known(_), Some(buffer)) => Some(RawLayout {
                kind: buffer.backing_kind(),
                x_offset: 0,
                physical_width: self.layout.width,
            }),
            _ => None,
        }
    }
}

impl<B: PixelBuffer> ReadableBitmapData for BitmapData<B> {
    fn row(&self, y: usize) -> Result<Row<'_>, BitmapError> {
        self.check_y(y)?;
        let bytes = self
            .buffer
            .as_ref()
            .ok_or_else(BitmapError::disposed)?
            .as_bytes();
        Ok(Row::new(bytes, self.layout, &*self.codec, self.context(), y))
    }
}

impl<B: PixelBuffer> WritableBitmapData for BitmapData<B> {
    fn row_mut(&mut self, y: usize) -> Result<RowMut<'_>, BitmapError> {
        self.check_y(y)?;
        let ctx = CodecContext {
            palette: self.palette.as_deref(),
            back_color: self.back_color,
            alpha_threshold: self.alpha_threshold,
            color_space: self.color_space.resolve(self.layout.info.linear_gamma()),
            width: self.layout.width,
            y,
        };
        let layout = self.layout;
        let bytes = self
            .buffer
            .as_mut()
            .ok_or_else(BitmapError::disposed)?
            .as_bytes_mut();
        Ok(RowMut::new(
            &mut bytes[y * layout.stride..],
            y,
            layout.height,
            layout,
            &*self.codec,
            ctx,
        ))
    }

    fn rows_mut(&mut self) -> Result<Vec<RowMut<'_>>, BitmapError> {
        let ctx = CodecContext {
            palette: self.palette.as_deref(),
            back_color: self.back_color,
            alpha_threshold: self.alpha_threshold,
            color_space: self.color_space.resolve(self.layout.info.linear_gamma()),
            width: self.layout.width,
            y: 0,
        };
        let layout = self.layout;
        let codec = &*self.codec;
        let bytes = self
            .buffer
            .as_mut()
            .ok_or_else(BitmapError::disposed)?
            .as_bytes_mut();
        Ok(bytes
            .chunks_mut(layout.stride)
            .take(layout.height)
            .enumerate()
            .map(|(y, chunk)| RowMut::new(chunk, y, y + 1, layout, codec, ctx))
            .collect())
    }

    /// Fills the first row through the pixel format, then replicates its
    /// bytes. Custom formats are filled pixel by pixel.
    fn clear(&mut self, color: Color32) -> Result<(), BitmapError> {
        if matches!(self.format, FormatSpec::Custom(_)) {
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

        let layout = self.layout;
        {
            let mut row = self.row_mut(0)?;
            if layout.info.is_byte_aligned() {
                row.set_color32(0, color)?;
                let px = layout.info.byte_width(1);
                let bytes = row.bytes_mut();
                for x in 1..layout.width {
                    bytes.copy_within(0..px, x * px);
                }
            } else {
                for x in 0..layout.width {
                    row.set_color32(x, color)?;
                }
            }
        }
        let bytes = self
            .buffer
            .as_mut()
            .ok_or_else(BitmapError::disposed)?
            .as_bytes_mut();
        for y in 1..layout.height {
            bytes.copy_within(0..layout.row_len, y * layout.stride);
        }
        Ok(())
    }
}

impl<B: PixelBuffer> ReadWriteBitmapData for BitmapData<B> {
    fn create_compatible(
        &self,
        width: usize,
        height: usize,
    ) -> Result<BitmapData<OwnedBuffer>, BitmapError> {
        let mut builder = BitmapDataBuilder::from_spec(width, height, self.format.clone())
            .with_back_color(self.back_color)
            .with_alpha_threshold(self.alpha_threshold)
            .with_working_color_space(self.color_space);
        if let Some(palette) = &self.palette {
            builder = builder.with_palette(Arc::clone(palette));
        }
        if let Some(pool) = &self.pool {
            builder = builder.with_pool(Arc::clone(pool));
        }
        builder.allocate()
    }
}

impl<B: PixelBuffer> fmt::Debug for BitmapData<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapData")
            .field("width", &self.layout.width)
            .field("height", &self.layout.height)
            .field("stride", &self.layout.stride)
            .field("format", &self.format)
            .field("palette_len", &self.palette.as_ref().map(|p| p.len()))
            .field("back_color", &self.back_color)
            .field("alpha_threshold", &self.alpha_threshold)
            .field("disposed", &self.buffer.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_replicates_first_row() {
        let mut bitmap = BitmapDataBuilder::new(5, 3, KnownPixelFormat::Format24bppRgb)
            .allocate()
            .unwrap();
        let c = Color32::from_rgb(1, 2, 3);
        bitmap.clear(c).unwrap();
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(bitmap.get_color32(x, y).unwrap(), c);
            }
        }
    }

    #[test]
    fn clear_sub_byte_format() {
        let mut bitmap = BitmapDataBuilder::new(11, 2, KnownPixelFormat::Format1bppIndexed)
            .allocate()
            .unwrap();
        bitmap.clear(Color32::WHITE).unwrap();
        assert_eq!(bitmap.get_color_index(10, 1).unwrap(), 1);
        assert_eq!(bitmap.bytes().unwrap()[0], 0xFF);
    }

    #[test]
    fn disposed_data_rejects_access() {
        let mut bitmap = BitmapDataBuilder::new(2, 2, KnownPixelFormat::Format32bppArgb)
            .allocate()
            .unwrap();
        bitmap.dispose();
        assert!(bitmap.is_disposed());
        assert!(bitmap.raw_layout().is_none());
        assert!(matches!(
            bitmap.get_color32(0, 0),
            Err(BitmapError::InvalidState(_))
        ));
        assert!(matches!(
            bitmap.set_color32(0, 0, Color32::BLACK),
            Err(BitmapError::InvalidState(_))
        ));
        bitmap.dispose();
    }

    #[test]
    fn rows_mut_are_disjoint_single_rows() {
        let mut bitmap = BitmapDataBuilder::new(3, 4, KnownPixelFormat::Format8bppGrayScale)
            .allocate()
            .unwrap();
        let mut rows = bitmap.rows_mut().unwrap();
        assert_eq!(rows.len(), 4);
        for row in &mut rows {
            let y = row.index();
            row.set_color32(2, Color32::from_gray(y as u8 * 10)).unwrap();
            assert!(!row.move_next_row());
        }
        drop(rows);
        assert_eq!(bitmap.get_color32(2, 3).unwrap(), Color32::from_gray(30));
    }
}
