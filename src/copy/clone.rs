use std::sync::Arc;

use super::{Mode, Options, Repr, Strategy, dispatch, missing_session, quantized_copy, raw};
use crate::buffer::OwnedBuffer;
use crate::color::Color32;
use crate::context::{Completion, OperationContext};
use crate::data::{BitmapData, BitmapDataBuilder, BitmapDataInfo, ClippedBitmapData, ReadableBitmapData};
use crate::dithering::Ditherer;
use crate::error::BitmapError;
use crate::format::KnownPixelFormat;
use crate::geometry::{Point, Rect};
use crate::palette::Palette;
use crate::quantizing::{PredefinedColorsQuantizer, Quantizer};

/// A pending clone of (a region of) bitmap data into a new allocation,
/// optionally converting, quantizing and dithering on the way.
///
/// Settings not given are taken from the source. For indexed target
/// formats the palette is, in order of preference: the explicit one, the
/// quantizer's palette, the source palette, the format's default; the
/// latter two only when they fit the format.
///
/// ```
/// use zenblit::{BitmapDataBuilder, CloneRequest, KnownPixelFormat, OperationContext,
///     OrderedDitherer, Rect};
///
/// let src = BitmapDataBuilder::new(64, 64, KnownPixelFormat::Format32bppArgb).allocate()?;
/// let ditherer = OrderedDitherer::bayer8x8();
/// let clone = CloneRequest::new(&src)
///     .with_rect(Rect::new(16, 16, 32, 32))
///     .with_format(KnownPixelFormat::Format1bppIndexed)
///     .with_ditherer(&ditherer)
///     .execute(&OperationContext::unstoppable())?
///     .expect("not cancelled");
/// assert_eq!((clone.width(), clone.height()), (32, 32));
/// # use zenblit::BitmapDataInfo;
/// # Ok::<(), zenblit::BitmapError>(())
/// ```
pub struct CloneRequest<'a> {
    source: &'a dyn ReadableBitmapData,
    rect: Option<Rect>,
    format: Option<KnownPixelFormat>,
    quantizer: Option<&'a dyn Quantizer>,
    ditherer: Option<&'a dyn Ditherer>,
    back_color: Option<Color32>,
    alpha_threshold: Option<u8>,
    palette: Option<Arc<Palette>>,
}

impl<'a> CloneRequest<'a> {
    pub fn new(source: &'a dyn ReadableBitmapData) -> Self {
        Self {
            source,
            rect: None,
            format: None,
            quantizer: None,
            ditherer: None,
            back_color: None,
            alpha_threshold: None,
            palette: None,
        }
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_format(mut self, format: KnownPixelFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_quantizer(mut self, quantizer: &'a dyn Quantizer) -> Self {
        self.quantizer = Some(quantizer);
        self
    }

    pub fn with_ditherer(mut self, ditherer: &'a dyn Ditherer) -> Self {
        self.ditherer = Some(ditherer);
        self
    }

    pub fn with_back_color(mut self, color: Color32) -> Self {
        self.back_color = Some(color);
        self
    }

    pub fn with_alpha_threshold(mut self, threshold: u8) -> Self {
        self.alpha_threshold = Some(threshold);
        self
    }

    pub fn with_palette(mut self, palette: Arc<Palette>) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Allocate the clone and copy into it. `Ok(None)` when cancelled.
    pub fn execute(
        self,
        ctx: &OperationContext<'_>,
    ) -> Result<Option<BitmapData<OwnedBuffer>>, BitmapError> {
        if self.source.is_disposed() {
            return Err(BitmapError::disposed());
        }
        let rect = match self.rect {
            Some(rect) => rect,
            None => self.source.bounds(),
        };
        let source = ClippedBitmapData::new(self.source, rect)?;
        let format = self.format.unwrap_or_else(|| default_format(&source));
        let max_palette = format.info().max_palette_size();

        let session = match self.quantizer {
            Some(q) => match q.initialize(&source, ctx) {
                Some(session) => Some(session),
                None => return missing_session(ctx, "quantizer").map(|_| None),
            },
            None => None,
        };

        let palette = if format.is_indexed() {
            self.palette
                .clone()
                .or_else(|| {
                    session
                        .as_ref()
                        .and_then(|s| s.palette())
                        .filter(|p| fits(p, max_palette))
                        .cloned()
                })
                .or_else(|| source.palette().filter(|p| fits(p, max_palette)).cloned())
        } else {
            None
        };

        let mut builder = BitmapDataBuilder::new(source.width(), source.height(), format)
            .with_back_color(self.back_color.unwrap_or_else(|| source.back_color()))
            .with_alpha_threshold(self.alpha_threshold.unwrap_or_else(|| source.alpha_threshold()))
            .with_working_color_space(source.working_color_space());
        if let Some(palette) = palette {
            builder = builder.with_palette(palette);
        }
        let mut target = builder.allocate()?;
        log::debug!(
            "cloning {}x{} region as {:?}",
            source.width(),
            source.height(),
            format
        );

        let origin = Point::default();
        let options = Options {
            mode: Mode::Copy,
            skip_transparent: false,
            parallelism: ctx.parallelism(),
        };
        let completion = match (&session, self.ditherer) {
            (Some(session), ditherer) => quantized_copy(
                &source,
                &mut target,
                origin,
                &**session,
                ditherer,
                options,
                ctx,
            )?,
            (None, Some(ditherer)) => {
                let q = PredefinedColorsQuantizer::for_target(&target);
                let Some(session) = q.initialize(&source, ctx) else {
                    return missing_session(ctx, "quantizer").map(|_| None);
                };
                quantized_copy(
                    &source,
                    &mut target,
                    origin,
                    &*session,
                    Some(ditherer),
                    options,
                    ctx,
                )?
            }
            (None, None) => {
                let strategy = match raw::plan(&source, &target, 0) {
                    Some(plan) => Strategy::Raw(plan),
                    None => Strategy::Direct(Repr::select(&source, &target)),
                };
                dispatch::run(&source, &mut target, origin, &strategy, options.parallelism, ctx)?
            }
        };
        Ok(match completion {
            Completion::Finished => Some(target),
            Completion::Cancelled(_) => None,
        })
    }
}

fn fits(palette: &Arc<Palette>, max: Option<usize>) -> bool {
    max.is_some_and(|max| palette.len() <= max)
}

/// The built-in format closest to a source of any format.
fn default_format<T: BitmapDataInfo + ?Sized>(source: &T) -> KnownPixelFormat {
    if let Some(format) = source.known_format() {
        return format;
    }
    let info = source.pixel_format();
    if info.is_indexed() {
        let len = source.palette().map_or(256, |p| p.len());
        return match len {
            ..=2 => KnownPixelFormat::Format1bppIndexed,
            ..=16 => KnownPixelFormat::Format4bppIndexed,
            ..=256 => KnownPixelFormat::Format8bppIndexed,
            _ => KnownPixelFormat::Format32bppArgb,
        };
    }
    if info.prefers_128() {
        KnownPixelFormat::Format128bppRgba
    } else if info.prefers_64() {
        KnownPixelFormat::Format64bppArgb
    } else {
        KnownPixelFormat::Format32bppArgb
    }
}
