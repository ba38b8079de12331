use std::sync::Arc;

use super::bitmap::{BitmapData, FormatSpec};
use super::row::Layout;
use crate::buffer::{OwnedBuffer, PixelBuffer};
use crate::codec::{PixelCodec, known_codec};
use crate::color::{Color32, WorkingColorSpace};
use crate::error::BitmapError;
use crate::format::{CustomPixelFormat, KnownPixelFormat, PixelFormatInfo};
use crate::limits::Limits;
use crate::palette::Palette;
use crate::pool::BufferPool;

/// Builder for [`BitmapData`].
///
/// ```
/// use zenblit::{BitmapDataBuilder, Color32, KnownPixelFormat, ReadableBitmapData};
///
/// let bitmap = BitmapDataBuilder::new(16, 16, KnownPixelFormat::Format24bppRgb)
///     .with_back_color(Color32::WHITE)
///     .allocate()?;
/// assert_eq!(bitmap.get_color32(3, 3)?, Color32::BLACK);
/// # Ok::<(), zenblit::BitmapError>(())
/// ```
///
/// Indexed formats use the palette's back color, alpha threshold and
/// working color space. Without an explicit palette a default one is
/// picked by bit depth (black and white, 4 grays, 16 or 256 system
/// colors) and the builder's settings are applied to it.
pub struct BitmapDataBuilder<'a> {
    width: usize,
    height: usize,
    format: FormatSpec,
    back_color: Color32,
    alpha_threshold: u8,
    palette: Option<Arc<Palette>>,
    color_space: WorkingColorSpace,
    limits: Option<&'a Limits>,
    pool: Option<Arc<dyn BufferPool>>,
}

struct Prepared {
    layout: Layout,
    codec: Arc<dyn PixelCodec>,
    palette: Option<Arc<Palette>>,
    back_color: Color32,
    alpha_threshold: u8,
    color_space: WorkingColorSpace,
}

impl<'a> BitmapDataBuilder<'a> {
    pub fn new(width: usize, height: usize, format: KnownPixelFormat) -> Self {
        Self::from_spec(width, height, FormatSpec::Known(format))
    }

    /// Bitmap data with a caller-defined pixel layout.
    pub fn custom(width: usize, height: usize, format: CustomPixelFormat) -> Self {
        Self::from_spec(width, height, FormatSpec::Custom(format))
    }

    pub(crate) fn from_spec(width: usize, height: usize, format: FormatSpec) -> Self {
        Self {
            width,
            height,
            format,
            back_color: Color32::BLACK,
            alpha_threshold: 128,
            palette: None,
            color_space: WorkingColorSpace::Default,
            limits: None,
            pool: None,
        }
    }

    /// Background for formats that cannot store transparency. Alpha is ignored.
    pub fn with_back_color(mut self, color: Color32) -> Self {
        self.back_color = color.to_opaque();
        self
    }

    pub fn with_alpha_threshold(mut self, threshold: u8) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    /// Palette for an indexed format. Rejected for non-indexed formats.
    pub fn with_palette(mut self, palette: Arc<Palette>) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_working_color_space(mut self, space: WorkingColorSpace) -> Self {
        self.color_space = space;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Pool that [`BitmapDataBuilder::allocate`] draws from and returns to.
    pub fn with_pool(mut self, pool: Arc<dyn BufferPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Allocate a zeroed buffer with rows packed tightly.
    pub fn allocate(self) -> Result<BitmapData<OwnedBuffer>, BitmapError> {
        let info = self.format.info();
        let stride = checked_byte_width(info, self.width, self.height)?;
        let len = stride
            .checked_mul(self.height)
            .ok_or(BitmapError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            })?;
        if let Some(limits) = self.limits {
            limits.check_allocation(self.width, self.height, len)?;
        }
        let prepared = self.prepare(stride)?;
        let buffer = OwnedBuffer::allocate(len, self.pool.clone());
        Ok(self.finish(buffer, prepared))
    }

    /// Wrap an existing buffer. The stride is the buffer's own when it has
    /// one, otherwise rows are assumed to be packed tightly.
    pub fn wrap<B: PixelBuffer>(self, buffer: B) -> Result<BitmapData<B>, BitmapError> {
        let stride = match buffer.natural_stride() {
            Some(stride) => stride,
            None => checked_byte_width(self.format.info(), self.width, self.height)?,
        };
        self.wrap_with_stride(buffer, stride)
    }

    /// Wrap an existing buffer whose rows start `stride` bytes apart.
    pub fn wrap_with_stride<B: PixelBuffer>(
        self,
        buffer: B,
        stride: usize,
    ) -> Result<BitmapData<B>, BitmapError> {
        let prepared = self.prepare(stride)?;
        let needed = (self.height - 1)
            .checked_mul(stride)
            .and_then(|n| n.checked_add(prepared.layout.row_len))
            .ok_or(BitmapError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            })?;
        let actual = buffer.as_bytes().len();
        if actual < needed {
            return Err(BitmapError::BufferTooSmall { needed, actual });
        }
        if let Some(limits) = self.limits {
            limits.check_dimensions(self.width, self.height)?;
        }
        Ok(self.finish(buffer, prepared))
    }

    fn prepare(&self, stride: usize) -> Result<Prepared, BitmapError> {
        let info = self.format.info();
        let row_len = checked_byte_width(info, self.width, self.height)?;
        if stride < row_len {
            return Err(BitmapError::InvalidArgument(std::format!(
                "stride {stride} is less than the {row_len} bytes of a row"
            )));
        }
        let codec: Arc<dyn PixelCodec> = match &self.format {
            FormatSpec::Known(format) => known_codec(*format),
            FormatSpec::Custom(format) => {
                format.validate()?;
                Arc::new(format.clone())
            }
        };
        let layout = Layout {
            width: self.width,
            height: self.height,
            stride,
            row_len,
            info,
        };

        if !info.is_indexed() {
            if self.palette.is_some() {
                return Err(BitmapError::InvalidArgument(
                    "a palette requires an indexed pixel format".into(),
                ));
            }
            return Ok(Prepared {
                layout,
                codec,
                palette: None,
                back_color: self.back_color,
                alpha_threshold: self.alpha_threshold,
                color_space: self.color_space,
            });
        }

        let palette = match &self.palette {
            Some(palette) => Arc::clone(palette),
            None => {
                let palette = Palette::default_for_bits(info.bits_per_pixel()).ok_or_else(|| {
                    BitmapError::InvalidArgument(std::format!(
                        "no default palette for {} bits per pixel",
                        info.bits_per_pixel()
                    ))
                })?;
                Arc::new(
                    palette
                        .with_back_color(self.back_color)
                        .with_alpha_threshold(self.alpha_threshold)
                        .with_working_color_space(self.color_space),
                )
            }
        };
        let max = info.max_palette_size().unwrap_or(0);
        if palette.len() > max {
            return Err(BitmapError::InvalidArgument(std::format!(
                "palette has {} entries, {} bits per pixel address {max}",
                palette.len(),
                info.bits_per_pixel()
            )));
        }
        Ok(Prepared {
            layout,
            codec,
            back_color: palette.back_color(),
            alpha_threshold: palette.alpha_threshold(),
            color_space: palette.working_color_space(),
            palette: Some(palette),
        })
    }

    fn finish<B: PixelBuffer>(self, buffer: B, prepared: Prepared) -> BitmapData<B> {
        BitmapData {
            buffer: Some(buffer),
            layout: prepared.layout,
            format: self.format,
            codec: prepared.codec,
            palette: prepared.palette,
            back_color: prepared.back_color,
            alpha_threshold: prepared.alpha_threshold,
            color_space: prepared.color_space,
            pool: self.pool,
        }
    }
}

/// Bytes in one row, after rejecting empty or overflowing dimensions.
fn checked_byte_width(
    info: PixelFormatInfo,
    width: usize,
    height: usize,
) -> Result<usize, BitmapError> {
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidArgument(std::format!(
            "bitmap size must be non-zero, got {width}x{height}"
        )));
    }
    width
        .checked_mul(info.bits_per_pixel() as usize)
        .map(|bits| bits.div_ceil(8))
        .ok_or(BitmapError::DimensionsTooLarge { width, height })
}
